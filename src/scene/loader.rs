use crate::error::LfError;
use crate::scene::scene::Scene;
use crate::shot::Shot;
use log::{debug, info};
use nalgebra_glm as glm;
use serde_json::Value;
use std::fs;
use std::path::Path;

// Accepted key spellings per field, highest priority first. Kept as explicit
// tables so the parsing behavior stays auditable.
const FILE_KEYS: &[&str] = &["imagefile", "file", "image"];
const POSITION_KEYS: &[&str] = &["location", "pos", "loc"];
const ROTATION_KEYS: &[&str] = &["rotation", "rot", "quaternion"];
const FOVY_KEYS: &[&str] = &["fovy", "fov", "fieldofview"];

/// Load a scene description and construct its shots, in file order.
///
/// Image paths resolve relative to the scene file's directory. Any malformed
/// entry aborts the whole load: either the full shot list is built or nothing
/// is.
pub fn load_scene(path: &Path, default_fovy: f32) -> Result<Scene, LfError> {
    let text = fs::read_to_string(path)?;
    let data: Value = serde_json::from_str(&text)
        .map_err(|e| LfError::SceneParse(format!("{}: {e}", path.display())))?;
    let dir = path.parent().unwrap_or_else(|| Path::new("."));

    let Some(images) = data.get("images") else {
        debug!("scene {} has no 'images' list", path.display());
        return Ok(Scene::default());
    };
    let entries = images
        .as_array()
        .ok_or_else(|| LfError::SceneParse("'images' must be an array".to_string()))?;

    let mut shots = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        let entry = entry
            .as_object()
            .ok_or_else(|| LfError::SceneParse(format!("entry {index}: not an object")))?;

        let file = lookup(entry, FILE_KEYS)
            .ok_or_else(|| missing(index, "image file", FILE_KEYS))?
            .as_str()
            .ok_or_else(|| LfError::SceneParse(format!("entry {index}: image file must be a string")))?;
        let position = lookup(entry, POSITION_KEYS)
            .ok_or_else(|| missing(index, "position", POSITION_KEYS))
            .and_then(|v| parse_vec3(index, v))?;
        let rotation = lookup(entry, ROTATION_KEYS)
            .ok_or_else(|| missing(index, "rotation", ROTATION_KEYS))
            .and_then(|v| parse_quat(index, v))?;
        let fovy = match lookup(entry, FOVY_KEYS) {
            Some(v) => v.as_f64().map(|f| f as f32).ok_or_else(|| {
                LfError::SceneParse(format!("entry {index}: fovy must be a number"))
            })?,
            None => default_fovy,
        };

        let shot = Shot::from_file(&dir.join(file), position, rotation, fovy, None)?;
        shots.push(shot);
    }

    info!("loaded {} shots from {}", shots.len(), path.display());
    Ok(Scene::new(shots))
}

fn lookup<'a>(entry: &'a serde_json::Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|k| entry.get(*k))
}

fn missing(index: usize, field: &str, keys: &[&str]) -> LfError {
    LfError::SceneParse(format!(
        "entry {index}: missing {field} (accepted keys: {})",
        keys.join(", ")
    ))
}

fn numbers(index: usize, value: &Value, arity: usize, field: &str) -> Result<Vec<f32>, LfError> {
    let items = value
        .as_array()
        .filter(|a| a.len() == arity)
        .ok_or_else(|| {
            LfError::SceneParse(format!("entry {index}: {field} must be an array of {arity} numbers"))
        })?;
    items
        .iter()
        .map(|v| v.as_f64().map(|f| f as f32))
        .collect::<Option<Vec<_>>>()
        .ok_or_else(|| {
            LfError::SceneParse(format!("entry {index}: {field} must be an array of {arity} numbers"))
        })
}

fn parse_vec3(index: usize, value: &Value) -> Result<glm::Vec3, LfError> {
    let n = numbers(index, value, 3, "position")?;
    Ok(glm::vec3(n[0], n[1], n[2]))
}

// Scene files store rotations as [x, y, z, w], which is also the component
// order glm::quat takes.
fn parse_quat(index: usize, value: &Value) -> Result<glm::Quat, LfError> {
    let n = numbers(index, value, 4, "rotation")?;
    Ok(glm::quat(n[0], n[1], n[2], n[3]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;

    fn write_png(dir: &Path, name: &str, w: u32, h: u32) {
        let img = image::RgbImage::from_fn(w, h, |x, y| image::Rgb([x as u8, y as u8, 0]));
        img.save(dir.join(name)).unwrap();
    }

    fn write_scene(dir: &Path, body: &str) -> std::path::PathBuf {
        let path = dir.join("scene.json");
        let mut f = File::create(&path).unwrap();
        f.write_all(body.as_bytes()).unwrap();
        path
    }

    #[test]
    fn loads_entries_in_file_order_with_parsed_poses() {
        let dir = tempfile::tempdir().unwrap();
        write_png(dir.path(), "a.png", 4, 4);
        write_png(dir.path(), "b.png", 4, 2);
        let scene_path = write_scene(
            dir.path(),
            r#"{"images": [
                {"imagefile": "a.png", "pos": [1.0, 2.0, 3.0], "rot": [0.0, 0.0, 0.0, 1.0], "fovy": 45.0},
                {"file": "b.png", "location": [0.0, 0.0, 5.0], "quaternion": [0.0, 1.0, 0.0, 0.0]}
            ]}"#,
        );

        let scene = load_scene(&scene_path, 60.0).unwrap();
        assert_eq!(scene.len(), 2);

        let a = scene.shots()[0].camera();
        assert!((a.position() - glm::vec3(1.0, 2.0, 3.0)).norm() < 1e-6);
        assert_eq!(a.fovy_degrees(), 45.0);

        let b = scene.shots()[1].camera();
        assert!((b.position() - glm::vec3(0.0, 0.0, 5.0)).norm() < 1e-6);
        // fovy falls back to the scene-wide default
        assert_eq!(b.fovy_degrees(), 60.0);
        // [x,y,z,w] = [0,1,0,0] is a half-turn about Y
        let q = b.orientation();
        assert!(q.w.abs() < 1e-6 && (q.j.abs() - 1.0).abs() < 1e-6);
        // aspect defaults to the image's
        assert_eq!(b.aspect_ratio(), 2.0);
    }

    #[test]
    fn alias_priority_is_first_match_wins() {
        let dir = tempfile::tempdir().unwrap();
        write_png(dir.path(), "a.png", 2, 2);
        write_png(dir.path(), "b.png", 2, 2);
        // "imagefile" outranks "file", "location" outranks "pos"
        let scene_path = write_scene(
            dir.path(),
            r#"{"images": [
                {"imagefile": "a.png", "file": "b.png",
                 "location": [9.0, 0.0, 0.0], "pos": [1.0, 0.0, 0.0],
                 "rot": [0.0, 0.0, 0.0, 1.0]}
            ]}"#,
        );
        let scene = load_scene(&scene_path, 60.0).unwrap();
        assert!((scene.shots()[0].camera().position().x - 9.0).abs() < 1e-6);
    }

    #[test]
    fn missing_rotation_aborts_the_whole_load() {
        let dir = tempfile::tempdir().unwrap();
        write_png(dir.path(), "a.png", 2, 2);
        let scene_path = write_scene(
            dir.path(),
            r#"{"images": [
                {"file": "a.png", "pos": [0.0, 0.0, 1.0], "rot": [0.0, 0.0, 0.0, 1.0]},
                {"file": "a.png", "pos": [0.0, 0.0, 2.0]}
            ]}"#,
        );
        let err = load_scene(&scene_path, 60.0).unwrap_err();
        assert!(matches!(err, LfError::SceneParse(_)));
        assert!(err.to_string().contains("entry 1"));
    }

    #[test]
    fn undecodable_image_aborts_the_whole_load() {
        let dir = tempfile::tempdir().unwrap();
        File::create(dir.path().join("junk.png"))
            .unwrap()
            .write_all(b"not a png")
            .unwrap();
        let scene_path = write_scene(
            dir.path(),
            r#"{"images": [{"file": "junk.png", "pos": [0,0,1], "rot": [0,0,0,1]}]}"#,
        );
        assert!(matches!(
            load_scene(&scene_path, 60.0),
            Err(LfError::ImageLoad { .. })
        ));
    }

    #[test]
    fn absent_images_list_gives_empty_scene() {
        let dir = tempfile::tempdir().unwrap();
        let scene_path = write_scene(dir.path(), r#"{"name": "empty"}"#);
        let scene = load_scene(&scene_path, 60.0).unwrap();
        assert!(scene.is_empty());
    }
}
