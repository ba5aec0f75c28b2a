//! Tests that need a real OpenGL 3.3 context. They open a hidden window, so they are
//! ignored by default; run them with `cargo test -- --ignored` on a machine with a display.

use std::path::PathBuf;

use glow::HasContext;
use projection_demo::{
    abs::{App, ShaderError, ShaderProgram, ShaderSources, ShaderStage},
    config::DemoConfig,
    demo::CubeDemo,
    projection::perspective,
};

const TRIANGLE_VERT: &str = r#"#version 330 core
layout (location = 0) in vec3 aPos;
void main()
{
    gl_Position = vec4(aPos, 1.0);
}
"#;

const TRIANGLE_FRAG: &str = r#"#version 330 core
out vec4 FragColor;
void main()
{
    FragColor = vec4(1.0, 0.5, 0.2, 1.0);
}
"#;

fn manifest_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

#[test]
#[ignore = "needs a display and an OpenGL 3.3 driver"]
fn test_gl_pipeline() {
    let app = App::hidden("projection-demo tests", 64, 64).unwrap();
    let gl = &app.gl;

    // A pass-through triangle links, and writing an unknown uniform is a no-op
    let program = ShaderProgram::from_source(gl, TRIANGLE_VERT, TRIANGLE_FRAG).unwrap();
    program.use_program();
    program.set_uniform("uDoesNotExist", 1.0f32);
    program.set_uniform("uDoesNotExist", glam::Mat4::IDENTITY);
    assert_eq!(unsafe { gl.get_error() }, glow::NO_ERROR);
    assert!(program.sources().is_none());
    assert!(matches!(program.reload(), Err(ShaderError::NoSources)));

    // Compile errors carry the stage and the driver log
    match ShaderProgram::from_source(gl, "#version 330 core\nvoid main() { oops }", TRIANGLE_FRAG) {
        Err(ShaderError::Compile { stage, log }) => {
            assert_eq!(stage, ShaderStage::Vertex);
            assert!(!log.is_empty());
        }
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("broken shader compiled"),
    }

    // Unreadable files are reported before anything reaches the driver
    let missing = ShaderProgram::from_name(gl, manifest_dir().join("shaders/missing"));
    assert!(matches!(missing, Err(ShaderError::Read { stage: ShaderStage::Vertex, .. })));

    // Programs built from files can be recreated independently
    let cube = ShaderProgram::from_name(gl, manifest_dir().join("shaders/cube")).unwrap();
    assert_eq!(
        cube.sources(),
        Some(&ShaderSources::from_name(manifest_dir().join("shaders/cube")))
    );
    let reloaded = cube.reload().unwrap();
    assert_ne!(cube.handle(), reloaded.handle());
    drop(cube);
    reloaded.use_program();
    assert_eq!(unsafe { gl.get_error() }, glow::NO_ERROR);

    // Raw projection matrices go to the mat4 uniform without a GL error
    let proj = perspective(45f32.to_radians(), 1.0, 0.1, 100.0).unwrap();
    reloaded.set_uniform("uProj", proj);
    reloaded.set_uniform("uModel", &glam::Mat4::IDENTITY);
    assert_eq!(unsafe { gl.get_error() }, glow::NO_ERROR);
    let location = unsafe { gl.get_uniform_location(reloaded.handle(), "uProj") }.unwrap();
    let mut uploaded = [0.0f32; 16];
    unsafe { gl.get_uniform_f32(reloaded.handle(), &location, &mut uploaded) };
    assert_eq!(uploaded, proj);

    // The vertex and fragment files can also be named separately
    let vertex = manifest_dir().join("shaders/cube.vert");
    let fragment = manifest_dir().join("shaders/cube.frag");
    let explicit = ShaderProgram::from_files(gl, vertex.clone(), fragment.clone()).unwrap();
    assert_eq!(explicit.sources(), Some(&ShaderSources::from_paths(vertex, fragment)));

    // Full scene setup and a couple of frames
    let config = DemoConfig {
        asset_dir: manifest_dir(),
        ..DemoConfig::default()
    };
    let mut demo = CubeDemo::new(gl, &config, app.drawable_size()).unwrap();
    demo.render(0.0);
    demo.resize(128, 64);
    assert_eq!(demo.projection().aspect(), 2.0);
    demo.resize(128, 0);
    assert_eq!(demo.projection().aspect(), 2.0);
    demo.render(1.0);
    assert_eq!(unsafe { gl.get_error() }, glow::NO_ERROR);
}
