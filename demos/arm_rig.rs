use std::sync::Arc;

use glam::{Quat, Vec3};
use sinew::{
    AnimationClip, AnimationPlayer, BlendShapeWeights, EyeSide, IkManager, InterpolationMode,
    LookAtIk, Skeleton, TwoBoneIk,
};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut skeleton = Skeleton::new("Puppet");
    let chest = skeleton.add_bone("Chest", None)?;
    let shoulder = skeleton.add_bone("Shoulder", Some(chest))?;
    let elbow = skeleton.add_bone("Elbow", Some(shoulder))?;
    let wrist = skeleton.add_bone("Wrist", Some(elbow))?;
    let head = skeleton.add_bone("Head", Some(chest))?;
    let eye = skeleton.add_bone("LeftEye", Some(head))?;

    skeleton.set_bone_local_position(shoulder, Vec3::new(0.2, 0.4, 0.0));
    skeleton.set_bone_local_position(elbow, Vec3::X * 0.3);
    skeleton.set_bone_local_position(wrist, Vec3::X * 0.25);
    skeleton.set_bone_local_position(head, Vec3::Y * 0.6);
    skeleton.set_bone_local_position(eye, Vec3::new(0.03, 0.05, 0.08));

    let mut wave = AnimationClip::new("Wave");
    wave.looping = true;
    for (time, angle) in [(0.0, 0.0), (0.5, 0.5), (1.0, 0.0)] {
        wave.add_rotation_keyframe(
            "Elbow",
            time,
            Quat::from_rotation_z(angle),
            InterpolationMode::CatmullRom,
        );
    }
    wave.add_event(0.5, "wave_peak");
    println!("Clip '{}' lasts {:.2}s", wave.name, wave.duration());

    let mut player = AnimationPlayer::new(Arc::new(wave));
    player.play();

    let mut ik = IkManager::new();
    ik.add(TwoBoneIk::new(shoulder, elbow, wrist, Vec3::new(0.6, 0.6, 0.2)));
    ik.add(LookAtIk::new(eye, Vec3::new(0.5, 0.8, 1.0)).for_eye(EyeSide::Left));
    ik.global_weight = 0.5;

    let mut shapes = BlendShapeWeights::default();
    for frame in 0..60 {
        for event in player.update(1.0 / 30.0) {
            println!("frame {frame}: event '{}' at {:.2}s", event.name, event.time);
        }
        player.sample(&mut skeleton, Some(&mut shapes));
        ik.solve_with_blend_shapes(&mut skeleton, Some(&mut shapes));
    }

    skeleton.update_matrices();
    if let Some(position) = skeleton.model_position(wrist) {
        log::info!("Wrist settled at {position}");
        println!("Wrist: {position}");
    }
    let mut names: Vec<_> = shapes.iter().collect();
    names.sort_by(|a, b| a.0.cmp(b.0));
    for (name, weight) in names {
        println!("{name}: {weight:.3}");
    }

    Ok(())
}
