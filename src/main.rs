use anyhow::{Context, bail};
use lfvis_rs::{
    PoseCell, RenderWorker, Renderer, RendererConfig, SceneHandle, ViewerSettings, WorkerEvent,
    load_scene, renderer::BlendMode,
};
use log::{info, warn};
use nalgebra_glm as glm;
use std::path::PathBuf;
use std::time::Instant;

struct Args {
    scene: PathBuf,
    frames: u32,
    size: Option<(u32, u32)>,
    blend: Option<BlendMode>,
    out: Option<PathBuf>,
}

fn usage() -> &'static str {
    "usage: lfvis-rs <scene.json> [--frames N] [--size WxH] [--blend average|nearest] [--out frame.png]"
}

/// Ok(None) means help was requested and printed; the caller exits cleanly.
fn parse_args(mut it: impl Iterator<Item = String>) -> anyhow::Result<Option<Args>> {
    let mut scene = None;
    let mut frames = 120u32;
    let mut size = None;
    let mut blend = None;
    let mut out = None;

    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--frames" => {
                let v = it.next().context("--frames needs a value")?;
                frames = v.parse().context("--frames must be a number")?;
            }
            "--size" => {
                let v = it.next().context("--size needs a value, e.g. 512x512")?;
                let (w, h) = v
                    .split_once('x')
                    .and_then(|(w, h)| Some((w.parse().ok()?, h.parse().ok()?)))
                    .context("--size must look like 512x512")?;
                size = Some((w, h));
            }
            "--blend" => {
                let v = it.next().context("--blend needs a value")?;
                blend = Some(v.parse::<BlendMode>()?);
            }
            "--out" => {
                out = Some(PathBuf::from(it.next().context("--out needs a path")?));
            }
            "--help" | "-h" => {
                println!("{}", usage());
                return Ok(None);
            }
            other if scene.is_none() => scene = Some(PathBuf::from(other)),
            other => bail!("unexpected argument '{other}'\n{}", usage()),
        }
    }

    Ok(Some(Args {
        scene: scene.with_context(|| usage().to_string())?,
        frames,
        size,
        blend,
        out,
    }))
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let Some(args) = parse_args(std::env::args().skip(1))? else {
        return Ok(());
    };

    let settings = ViewerSettings::load();
    let (width, height) = args
        .size
        .unwrap_or((settings.resolution[0], settings.resolution[1]));

    let scene = load_scene(&args.scene, settings.default_fovy)?;
    if scene.is_empty() {
        warn!("scene {} contains no shots", args.scene.display());
    }

    let config = RendererConfig {
        blend_mode: args.blend.unwrap_or(settings.blend_mode),
        background: settings.background_color,
        ..Default::default()
    };
    let renderer = Renderer::with_config(width, height, config)?;

    // Start from the first shot's viewpoint, adapted to the output aspect.
    let mut camera = scene
        .shots()
        .first()
        .map(|s| s.camera().clone())
        .unwrap_or_default();
    camera.set_intrinsics(camera.fovy_degrees(), width as f32 / height as f32)?;
    let radius = camera.position().norm().max(1.0);

    let pose = PoseCell::new(camera);
    let scene = SceneHandle::new(scene);
    let (events_tx, events_rx) = crossbeam_channel::bounded(2);
    let worker = RenderWorker::spawn(renderer, scene, pose.clone(), events_tx);

    // Headless stand-in for the interactive surface: one incremental
    // whole-pose update per frame, orbiting the scene origin.
    let step = std::f32::consts::TAU / args.frames.max(1) as f32;
    let mut angle = 0.0f32;
    let mut rendered = 0u32;
    let mut last_frame = None;
    let started = Instant::now();

    while rendered < args.frames {
        match events_rx.recv() {
            Ok(WorkerEvent::Frame(frame)) => {
                rendered += 1;
                last_frame = Some(frame);

                angle += step;
                let position = glm::vec3(radius * angle.sin(), 0.0, radius * angle.cos());
                let orientation = glm::quat_angle_axis(angle, &glm::vec3(0.0, 1.0, 0.0));
                pose.update(|c| c.set_pose(position, orientation))?;
            }
            Ok(WorkerEvent::Error(e)) => {
                worker.stop();
                return Err(e.into());
            }
            Ok(WorkerEvent::Stopped) => break,
            Err(_) => bail!("render worker exited unexpectedly"),
        }
    }
    worker.stop();

    let elapsed = started.elapsed();
    info!(
        "rendered {rendered} frames at {width}x{height} in {elapsed:.2?} ({:.1} fps)",
        rendered as f64 / elapsed.as_secs_f64().max(1e-9)
    );

    if let (Some(out), Some(frame)) = (&args.out, &last_frame) {
        frame.save_png(out)?;
        info!("wrote {}", out.display());
    }

    Ok(())
}
