use assert_cmd::prelude::*;
use std::fs;
use std::process::Command;

#[test]
fn generate_then_render_a_small_image() -> Result<(), Box<dyn std::error::Error>> {
    let dir = std::env::temp_dir().join("raypath-cli-generate");
    fs::create_dir_all(&dir)?;
    let scene = dir.join("cornell.json");
    let img = dir.join("pic.png");

    let mut cmd = Command::cargo_bin("raypath")?;
    cmd.arg("--generate")
        .arg("--scene-file")
        .arg(&scene)
        .assert()
        .success();
    assert!(scene.is_file());

    let mut cmd = Command::cargo_bin("raypath")?;
    cmd.arg("--scene-file")
        .arg(&scene)
        .arg("--img-file")
        .arg(&img)
        .args(["-x", "16", "-y", "16", "--max-depth", "0", "--samples", "1"])
        .assert()
        .success();
    assert!(img.is_file());

    Ok(())
}

#[test]
fn render_the_shipped_cornell_scene() -> Result<(), Box<dyn std::error::Error>> {
    let dir = std::env::temp_dir().join("raypath-cli-shipped");
    fs::create_dir_all(&dir)?;
    let img = dir.join("pic.png");

    let mut cmd = Command::cargo_bin("raypath")?;
    cmd.arg("--scene-file")
        .arg("scenes/cornell-emissive.json")
        .arg("--img-file")
        .arg(&img)
        .args(["-x", "8", "-y", "8", "--max-depth", "0", "--samples", "1"])
        .assert()
        .success();
    assert!(img.is_file());

    Ok(())
}
