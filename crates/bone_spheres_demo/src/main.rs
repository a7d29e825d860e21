//! Bone Spheres Demo
//!
//! Replays a scenario file against an in-memory skeleton and prints every
//! bone sphere event.
//!
//! Run with: cargo run -p bone_spheres_demo -- [scenario.toml]

mod scenario;
mod scene;

use bone_spheres::prelude::*;
use parking_lot::Mutex;
use scenario::{FrameDef, Scenario};
use scene::{LoggingScene, Skeleton};
use std::collections::HashMap;
use std::sync::Arc;

/// Listener that buffers events until the frame loop prints them
struct EventLog {
    id: ListenerId,
    events: Mutex<Vec<SphereEvent>>,
}

impl SphereListener for EventLog {
    fn id(&self) -> &ListenerId {
        &self.id
    }

    fn on_event(&self, event: &SphereEvent) {
        self.events.lock().push(*event);
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| concat!(env!("CARGO_MANIFEST_DIR"), "/scenarios/wrist_tap.toml").to_string());

    let scenario = match Scenario::load(&path) {
        Ok(scenario) => scenario,
        Err(e) => {
            log::error!("Failed to load scenario {}: {}", path, e);
            std::process::exit(1);
        }
    };

    if let Err(e) = run(&scenario) {
        log::error!("Scenario failed: {}", e);
        std::process::exit(1);
    }
}

fn run(scenario: &Scenario) -> Result<(), Box<dyn std::error::Error>> {
    log::info!(
        "Running scenario '{}' ({} frames)",
        scenario.scenario.name,
        scenario.frame_count()
    );
    if !scenario.scenario.description.is_empty() {
        println!("{}", scenario.scenario.description);
    }

    let config = scenario.config.clone().unwrap_or_else(SphereConfig::load);
    let labels: HashMap<TrackedSlot, String> = config
        .tracked_points
        .iter()
        .map(|p| (p.slot, p.label.clone()))
        .collect();

    let skeleton = Arc::new(Skeleton::from_defs(&scenario.bones));
    let scene = Arc::new(LoggingScene::default());
    log::info!("Skeleton has {} bones", skeleton.len());

    let spheres = BoneSpheres::with_skeleton_tracking(config, skeleton.clone(), scene.clone())?;

    let log = Arc::new(EventLog {
        id: ListenerId::new(1, "BoneSpheresDemo"),
        events: Mutex::new(Vec::new()),
    });
    spheres.register_listener(log.clone());

    let mut ids: HashMap<String, SphereHandle> = HashMap::new();
    for def in &scenario.spheres {
        match spheres.create_volume(def.radius, &def.bone, Vec3::from_array(def.offset)) {
            Ok(handle) => {
                ids.insert(def.id.clone(), handle);
            }
            Err(e) => log::warn!("Sphere '{}' skipped: {}", def.id, e),
        }
    }
    let names: HashMap<SphereHandle, &str> = ids.iter().map(|(k, v)| (*v, k.as_str())).collect();

    let mut frame = 0u64;
    for def in &scenario.frames {
        apply_frame(def, &spheres, &skeleton, &ids);

        for _ in 0..def.repeat {
            frame += 1;
            spheres.on_frame_update();

            let events = std::mem::take(&mut *log.events.lock());
            for event in events {
                print_event(frame, &event, &names, &labels);
            }
        }
    }

    let (attached, visible) = scene.marker_summary();
    println!(
        "{} frames, {} spheres left, {} markers attached ({} visible)",
        frame,
        spheres.volume_count(),
        attached,
        visible
    );

    spheres.shutdown();
    Ok(())
}

fn apply_frame(
    def: &FrameDef,
    spheres: &BoneSpheres,
    skeleton: &Skeleton,
    ids: &HashMap<String, SphereHandle>,
) {
    for pose in &def.pose {
        skeleton.set_local(&pose.bone, pose.local_transform());
    }
    for bone in &def.show_bones {
        skeleton.set_present(bone, true);
    }
    for bone in &def.hide_bones {
        skeleton.set_present(bone, false);
    }

    if let Some(visible) = def.all_markers {
        spheres.set_all_debug_visible(visible);
    }
    for id in &def.show_markers {
        if let Some(handle) = ids.get(id) {
            spheres.set_volume_debug_visible(*handle, true);
        }
    }
    for id in &def.hide_markers {
        if let Some(handle) = ids.get(id) {
            spheres.set_volume_debug_visible(*handle, false);
        }
    }
    for id in &def.destroy {
        if let Some(handle) = ids.get(id) {
            spheres.destroy_volume(*handle);
        }
    }

    if let Some(event) = def.lifecycle {
        spheres.broadcast_lifecycle_event(event);
    }
}

fn print_event(
    frame: u64,
    event: &SphereEvent,
    names: &HashMap<SphereHandle, &str>,
    labels: &HashMap<TrackedSlot, String>,
) {
    let kind = event.kind();
    match (event.handle(), event.slot()) {
        (Some(handle), Some(slot)) => {
            let sphere = names.get(&handle).copied().unwrap_or("?");
            let hand = labels.get(&slot).map(String::as_str).unwrap_or("?");
            println!(
                "[frame {:>4}] {:?}({}) sphere '{}' ({}) by {} (device {})",
                frame,
                kind,
                kind.code(),
                sphere,
                handle,
                hand,
                slot.device_id()
            );
        }
        _ => println!("[frame {:>4}] {:?}({})", frame, kind, kind.code()),
    }
}
