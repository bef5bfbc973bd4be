use clap::{Args, ValueEnum};
use motipet_core::{
    Config, GameViewModel, PetScene, Point, PointerId, ReadinessSimulator, SceneEvent, Size,
};
use serde::Serialize;

use super::{load_library, print_json};

#[derive(Clone, Copy, ValueEnum)]
pub enum Gesture {
    /// Single quick tap
    Tap,
    /// Several taps inside the multi-tap window
    Rapid,
    /// Press and hold
    Long,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum Target {
    Head,
    Body,
}

#[derive(Args)]
pub struct TouchArgs {
    pub gesture: Gesture,
    #[arg(long, value_enum, default_value = "body")]
    pub target: Target,
    /// Taps in a rapid run
    #[arg(long, default_value = "3")]
    pub count: u32,
    /// How long a long press is held, in milliseconds
    #[arg(long, default_value = "1000")]
    pub hold_ms: u64,
    /// Simulated scene width
    #[arg(long, default_value = "390")]
    pub width: f64,
    /// Simulated scene height
    #[arg(long, default_value = "844")]
    pub height: f64,
}

#[derive(Serialize)]
struct Step {
    at_ms: u64,
    #[serde(flatten)]
    event: SceneEvent,
    #[serde(skip_serializing_if = "Option::is_none")]
    clip: Option<String>,
}

/// Gap between taps of a rapid run; well inside the default window.
const TAP_GAP_MS: u64 = 150;
const TAP_HOLD_MS: u64 = 60;

pub fn run(args: TouchArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let mut scene = PetScene::new(
        &config,
        load_library(&config),
        Size::new(args.width, args.height),
        0,
    );
    let mut vm = GameViewModel::new(ReadinessSimulator::new(config.ambient.seed));
    vm.initialize(0);

    let point = touch_point(&scene, args.target, config.gesture.head_boundary_ratio);
    let mut steps = Vec::new();
    let mut now = 100;

    let presses: Vec<(u64, u64)> = match args.gesture {
        Gesture::Tap => vec![(now, TAP_HOLD_MS)],
        Gesture::Rapid => (0..args.count.max(1) as u64)
            .map(|i| (now + i * TAP_GAP_MS, TAP_HOLD_MS))
            .collect(),
        Gesture::Long => vec![(now, args.hold_ms)],
    };

    for (i, (at, hold)) in presses.into_iter().enumerate() {
        let pointer = PointerId(i as u64);
        let events = scene.touch_began(pointer, point, at);
        record(&mut steps, &mut scene, &vm, events, at);
        // Let deadlines fire while the finger is down.
        while let Some(due) = scene.classifier().next_deadline().filter(|&d| d < at + hold) {
            let events = scene.tick(due);
            record(&mut steps, &mut scene, &vm, events, due);
        }
        let events = scene.touch_ended(pointer, at + hold);
        record(&mut steps, &mut scene, &vm, events, at + hold);
        now = at + hold;
    }

    // Close any pending tap run.
    while let Some(due) = scene.classifier().next_deadline() {
        let events = scene.tick(due.max(now));
        record(&mut steps, &mut scene, &vm, events, due.max(now));
        now = due.max(now);
    }

    print_json(&steps)
}

fn record(
    steps: &mut Vec<Step>,
    scene: &mut PetScene,
    vm: &GameViewModel,
    events: Vec<SceneEvent>,
    now_ms: u64,
) {
    for event in events {
        if let SceneEvent::Interaction(interaction) = &event {
            if let Some(reaction) = vm.handle_interaction(interaction) {
                scene.apply_reaction(&reaction, now_ms);
            }
        }
        let clip = scene.current_tag(now_ms);
        steps.push(Step {
            at_ms: now_ms,
            event,
            clip,
        });
    }
}

/// A point on the requested part of the pet at rest.
fn touch_point(scene: &PetScene, target: Target, head_ratio: f64) -> Point {
    let center = scene.pet_position(0);
    let h = scene.pet_size().height;
    let y = match target {
        Target::Head => center.y + h * (0.5 + head_ratio.max(-0.5)) / 2.0,
        Target::Body => center.y + h * (head_ratio.min(0.5) - 0.5) / 2.0,
    };
    Point::new(center.x, y)
}
