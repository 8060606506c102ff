mod camera;

use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use bevy_egui::{egui, EguiContexts, EguiPlugin};
use camera::{camera_pan, camera_zoom, setup_camera, CameraState, MainCamera};
use flocksim::agent::Agent;
use flocksim::config::SimConfig;
use flocksim::food::Food;
use flocksim::human::Human;
use flocksim::map::ObstacleMap;
use flocksim::population::{SpawnKind, SpawnRequest};
use flocksim::{SimulationPlugin, SimulationState};
use rand::Rng;
use std::path::Path;

const CONFIG_PATH: &str = "assets/config.json";
const MAP_PATH: &str = "assets/obstacles.json";

fn main() {
    let (config, map) = load_or_exit();
    let resolution = (config.arena_width, config.arena_height);

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Flock Hunt".to_string(),
                resolution: resolution.into(),
                ..default()
            }),
            ..default()
        }))
        .add_plugins(EguiPlugin)
        .insert_resource(config)
        .insert_resource(map)
        .init_resource::<CameraState>()
        .add_plugins(SimulationPlugin)
        .add_systems(Startup, (setup_camera, spawn_obstacle_visuals))
        .add_systems(
            Update,
            (
                camera_zoom,
                camera_pan,
                handle_spawn_clicks,
                attach_agent_visuals,
                attach_human_visuals,
                attach_food_visuals,
                recolor_agents,
                ui_system,
            ),
        )
        .run();
}

/// Optional JSON files override the built-in config and the empty obstacle
/// map. A file that exists but does not parse is a hard startup failure.
fn load_or_exit() -> (SimConfig, ObstacleMap) {
    let config = if Path::new(CONFIG_PATH).exists() {
        SimConfig::load_json(CONFIG_PATH).unwrap_or_else(|err| {
            eprintln!("{err}");
            std::process::exit(1);
        })
    } else {
        SimConfig::default()
    };
    let map = if Path::new(MAP_PATH).exists() {
        ObstacleMap::load_json(MAP_PATH).unwrap_or_else(|err| {
            eprintln!("{err}");
            std::process::exit(1);
        })
    } else {
        ObstacleMap::default()
    };
    (config, map)
}

/// System to turn mouse clicks into spawn requests: left click drops a burst
/// of agents, right click drops one piece of food. The population manager
/// does the obstacle/ceiling validation.
fn handle_spawn_clicks(
    mouse_button: Res<ButtonInput<MouseButton>>,
    config: Res<SimConfig>,
    window_query: Query<&Window, With<PrimaryWindow>>,
    camera_query: Query<(&Camera, &GlobalTransform), With<MainCamera>>,
    mut requests: EventWriter<SpawnRequest>,
) {
    let left = mouse_button.just_pressed(MouseButton::Left);
    let right = mouse_button.just_pressed(MouseButton::Right);
    if !left && !right {
        return;
    }
    let Ok(window) = window_query.get_single() else {
        return;
    };
    let Some(cursor) = window.cursor_position() else {
        return;
    };
    let Ok((camera, camera_transform)) = camera_query.get_single() else {
        return;
    };
    let Ok(position) = camera.viewport_to_world_2d(camera_transform, cursor) else {
        return;
    };

    if left {
        let (lo, hi) = config.spawn_burst;
        let burst = rand::thread_rng().gen_range(lo..=hi);
        for _ in 0..burst {
            requests.send(SpawnRequest {
                position,
                kind: SpawnKind::Agent,
            });
        }
    }
    if right {
        requests.send(SpawnRequest {
            position,
            kind: SpawnKind::Food,
        });
    }
}

/// System to give freshly spawned agents a mesh; the engine spawns bare
/// entities so it can run headless.
fn attach_agent_visuals(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    fresh: Query<Entity, (With<Agent>, Without<Mesh2d>)>,
) {
    for entity in fresh.iter() {
        commands.entity(entity).insert((
            Mesh2d(meshes.add(Circle::new(10.0))),
            MeshMaterial2d(materials.add(ColorMaterial::from_color(Color::srgb(0.9, 0.8, 0.2)))),
        ));
    }
}

fn attach_human_visuals(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    fresh: Query<Entity, (With<Human>, Without<Mesh2d>)>,
) {
    for entity in fresh.iter() {
        commands.entity(entity).insert((
            Mesh2d(meshes.add(Circle::new(10.0))),
            MeshMaterial2d(materials.add(ColorMaterial::from_color(Color::srgb(0.2, 0.8, 0.2)))),
        ));
    }
}

fn attach_food_visuals(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    fresh: Query<Entity, (With<Food>, Without<Mesh2d>)>,
) {
    for entity in fresh.iter() {
        commands.entity(entity).insert((
            Mesh2d(meshes.add(Circle::new(5.0))),
            MeshMaterial2d(materials.add(ColorMaterial::from_color(Color::srgb(0.2, 0.8, 0.9)))),
        ));
    }
}

/// System to color agents by the hungry/fed rendering hint.
fn recolor_agents(
    config: Res<SimConfig>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    agents: Query<(&Agent, &MeshMaterial2d<ColorMaterial>), Changed<Agent>>,
) {
    for (agent, material) in agents.iter() {
        if let Some(material) = materials.get_mut(&material.0) {
            material.color = if agent.is_hungry(config.hunger_threshold) {
                Color::srgb(0.9, 0.2, 0.2)
            } else {
                Color::srgb(0.9, 0.8, 0.2)
            };
        }
    }
}

/// Startup system drawing the obstacle rectangles behind the entities.
fn spawn_obstacle_visuals(mut commands: Commands, map: Res<ObstacleMap>) {
    for rect in map.rects() {
        commands.spawn((
            Sprite {
                color: Color::srgb(0.35, 0.3, 0.3),
                custom_size: Some(rect.size()),
                ..default()
            },
            Transform::from_xyz(rect.center().x, rect.center().y, -1.0),
        ));
    }
}

fn ui_system(
    mut contexts: EguiContexts,
    mut simulation_state: ResMut<SimulationState>,
    config: Res<SimConfig>,
    agents: Query<&Agent>,
    humans: Query<(), With<Human>>,
    foods: Query<(), With<Food>>,
) {
    egui::Window::new("Simulation Info")
        .default_pos(egui::pos2(10.0, 10.0))
        .show(contexts.ctx_mut(), |ui| {
            ui.horizontal(|ui| {
                let button_text = if *simulation_state == SimulationState::Running {
                    "⏸ Pause"
                } else {
                    "▶ Resume"
                };

                if ui.button(button_text).clicked() {
                    *simulation_state = if *simulation_state == SimulationState::Running {
                        SimulationState::Paused
                    } else {
                        SimulationState::Running
                    };
                }

                let state_text = if *simulation_state == SimulationState::Running {
                    "Running"
                } else {
                    "Paused"
                };
                ui.label(format!("State: {}", state_text));
            });

            ui.separator();
            ui.heading("Population");
            ui.separator();

            let agent_count = agents.iter().count();
            let hungry_count = agents
                .iter()
                .filter(|a| a.is_hungry(config.hunger_threshold))
                .count();

            let hunting_count = agents.iter().filter(|a| a.target.is_some()).count();

            ui.label(format!("Agents: {}", agent_count));
            ui.label(format!("  hungry: {}", hungry_count));
            ui.label(format!("  hunting: {}", hunting_count));
            ui.label(format!("Humans: {}", humans.iter().count()));
            ui.label(format!("Food: {}", foods.iter().count()));

            if agent_count > 0 {
                let total_hunger: f32 = agents.iter().map(|a| a.hunger).sum();
                ui.label(format!(
                    "Avg Hunger: {:.1}",
                    total_hunger / agent_count as f32
                ));
            }

            ui.separator();
            ui.label(format!("Boundary: {:?}", config.boundary_policy));

            ui.separator();
            ui.label("Controls:");
            ui.label("• Left Click - Spawn agents");
            ui.label("• Right Click - Drop food");
            ui.label("• Mouse Wheel - Zoom in/out");
            ui.label("• Middle Mouse - Pan camera");
        });
}
