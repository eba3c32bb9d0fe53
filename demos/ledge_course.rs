use avian3d::prelude::*;
use bevy::{prelude::*, window::{CursorGrabMode, CursorOptions, PrimaryWindow}};
use bevy_ledge_locomotion::prelude::*;

/// Seconds between footstep cues at walking speed
const STRIDE_TIME: f32 = 0.45;

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Ledge Course".into(),
                ..default()
            }),
            ..default()
        }))
        .add_plugins(LedgeLocomotionPlugin)
        .init_resource::<StrideClock>()
        .add_systems(Startup, (setup, spawn_hud, setup_cursor_grab))
        .add_systems(
            Update,
            (toggle_cursor_grab, fake_animation_cues, log_messages, update_hud),
        )
        .run();
}

fn setup(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    spawn_player(&mut commands, PlayerConfig::default(), Vec3::new(0.0, 2.0, 6.0));

    commands.spawn((
        DirectionalLight {
            illuminance: 8_000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(4.0, 10.0, 6.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    let ground = materials.add(StandardMaterial {
        base_color: Color::srgb(0.35, 0.55, 0.35),
        perceptual_roughness: 0.9,
        ..default()
    });
    let stone = materials.add(StandardMaterial {
        base_color: Color::srgb(0.45, 0.43, 0.45),
        perceptual_roughness: 0.85,
        ..default()
    });
    let ledge = materials.add(StandardMaterial {
        base_color: Color::srgb(0.8, 0.55, 0.2),
        perceptual_roughness: 0.6,
        ..default()
    });

    commands.spawn((
        Mesh3d(meshes.add(Plane3d::default().mesh().size(80.0, 80.0))),
        MeshMaterial3d(ground),
        RigidBody::Static,
        Collider::half_space(Vec3::Y),
        CollisionLayers::new(GameLayer::World, [GameLayer::Player]),
    ));

    // Steps up to a launch platform in front of the wall
    for (i, height) in [0.5, 1.0, 1.5].into_iter().enumerate() {
        spawn_block(
            &mut commands,
            &mut meshes,
            stone.clone(),
            Vec3::new(2.0, height, 1.5),
            Vec3::new(-4.0 + i as f32 * 2.0, height / 2.0, 3.0),
        );
    }

    // Tall wall with a grabbable lip along its top edge
    let wall_height = 4.0;
    let wall_width = 8.0;
    spawn_block(
        &mut commands,
        &mut meshes,
        stone,
        Vec3::new(wall_width, wall_height, 1.0),
        Vec3::new(0.0, wall_height / 2.0, 0.0),
    );
    spawn_ledge(
        &mut commands,
        &mut meshes,
        ledge,
        Vec3::new(wall_width, 0.2, 0.2),
        Vec3::new(0.0, wall_height - 0.1, 0.55),
    );
}

fn spawn_block(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    material: Handle<StandardMaterial>,
    size: Vec3,
    position: Vec3,
) {
    commands.spawn((
        Mesh3d(meshes.add(Cuboid::new(size.x, size.y, size.z))),
        MeshMaterial3d(material),
        Transform::from_translation(position),
        RigidBody::Static,
        Collider::cuboid(size.x, size.y, size.z),
        CollisionLayers::new(GameLayer::World, [GameLayer::Player]),
    ));
}

fn spawn_ledge(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    material: Handle<StandardMaterial>,
    size: Vec3,
    position: Vec3,
) {
    commands.spawn((
        Mesh3d(meshes.add(Cuboid::new(size.x, size.y, size.z))),
        MeshMaterial3d(material),
        Transform::from_translation(position),
        RigidBody::Static,
        Collider::cuboid(size.x, size.y, size.z),
        CollisionLayers::new(GameLayer::Ledge, [GameLayer::Player]),
    ));
}

// ── Stand-in animation layer ─────────────────────────────────────────

#[derive(Resource, Default)]
struct StrideClock {
    elapsed: f32,
}

/// Raises footstep and landing cues the way an animation graph would
fn fake_animation_cues(
    player_query: Query<(Entity, &AnimationParams), With<Player>>,
    mut locomotion: MessageReader<LocomotionMessage>,
    mut cues: MessageWriter<AnimationCue>,
    mut clock: ResMut<StrideClock>,
    time: Res<Time>,
) {
    let Ok((entity, params)) = player_query.single() else {
        return;
    };

    for message in locomotion.read() {
        if let LocomotionEvent::Landed { impact_speed } = message.event {
            cues.write(AnimationCue {
                entity,
                kind: CueKind::Land,
                weight: (impact_speed / 10.0).clamp(0.0, 1.0),
            });
        }
    }

    if !params.grounded || params.speed <= 0.0 {
        clock.elapsed = 0.0;
        return;
    }

    clock.elapsed += time.delta_secs() * params.speed / 2.0;
    if clock.elapsed >= STRIDE_TIME {
        clock.elapsed -= STRIDE_TIME;
        cues.write(AnimationCue {
            entity,
            kind: CueKind::Footstep,
            weight: 1.0,
        });
    }
}

fn log_messages(
    mut locomotion: MessageReader<LocomotionMessage>,
    mut audio: MessageReader<PlayerAudioMessage>,
) {
    for message in locomotion.read() {
        info!("{:?}", message.event);
    }
    for message in audio.read() {
        info!("audio: {message:?}");
    }
}

// ── HUD ─────────────────────────────────────────────────────────────

#[derive(Component)]
struct HudText;

fn spawn_hud(mut commands: Commands) {
    commands.spawn((
        HudText,
        Text::new(""),
        TextFont {
            font_size: 18.0,
            ..default()
        },
        TextColor(Color::WHITE),
        BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.5)),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(10.0),
            left: Val::Px(10.0),
            padding: UiRect::all(Val::Px(8.0)),
            ..default()
        },
    ));
}

fn update_hud(
    player_query: Query<&LocomotionController, With<Player>>,
    mut hud_query: Query<&mut Text, With<HudText>>,
) {
    let Ok(controller) = player_query.single() else {
        return;
    };

    for mut text in &mut hud_query {
        **text = format!(
            "State: {:?}\nSpeed: {:.2} m/s\nVertical: {:.2} m/s",
            controller.state(),
            controller.motion().speed(),
            controller.vertical_velocity(),
        );
    }
}

// ── Cursor grab ──────────────────────────────────────────────────────

fn setup_cursor_grab(mut cursor_query: Query<&mut CursorOptions, With<PrimaryWindow>>) {
    if let Ok(mut cursor) = cursor_query.single_mut() {
        cursor.grab_mode = CursorGrabMode::Locked;
        cursor.visible = false;
    }
}

fn toggle_cursor_grab(
    keyboard: Res<ButtonInput<KeyCode>>,
    mouse: Res<ButtonInput<MouseButton>>,
    mut cursor_query: Query<&mut CursorOptions, With<PrimaryWindow>>,
) {
    let Ok(mut cursor) = cursor_query.single_mut() else {
        return;
    };

    if keyboard.just_pressed(KeyCode::Escape) {
        cursor.grab_mode = CursorGrabMode::None;
        cursor.visible = true;
    } else if mouse.just_pressed(MouseButton::Left) && cursor.grab_mode == CursorGrabMode::None {
        cursor.grab_mode = CursorGrabMode::Locked;
        cursor.visible = false;
    }
}
