mod classifier;

pub use classifier::{GestureClassifier, GestureState, PointerId};
