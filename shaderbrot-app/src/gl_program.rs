use eframe::glow::{self, HasContext};
use tracing::{debug, info};

use shaderbrot_render::shader::{
    self, FRAGMENT_SHADER, QUAD_VERTEX_COUNT, UNIFORM_ITERATIONS, UNIFORM_MAX_X, UNIFORM_MAX_Y,
    UNIFORM_MIN_X, UNIFORM_MIN_Y, VERTEX_SHADER,
};
use shaderbrot_render::{RenderError, ViewportUniforms};

struct UniformLocations {
    min_x: glow::UniformLocation,
    max_x: glow::UniformLocation,
    min_y: glow::UniformLocation,
    max_y: glow::UniformLocation,
    iterations: glow::UniformLocation,
}

/// The compiled fractal program and the empty vertex array it draws with.
///
/// Created once at startup from eframe's glow context; every failure here is
/// fatal to the session.
pub(crate) struct FractalProgram {
    program: glow::Program,
    vertex_array: glow::VertexArray,
    locations: UniformLocations,
}

impl FractalProgram {
    pub(crate) fn new(gl: &glow::Context) -> shaderbrot_render::Result<Self> {
        // SAFETY: called on the UI thread that owns the current GL context.
        unsafe {
            let version_line = if gl.version().is_embedded {
                "#version 300 es"
            } else {
                "#version 330 core"
            };
            info!("OpenGL version: {}", gl.get_parameter_string(glow::VERSION));

            let program = link_program(gl, version_line)?;
            let locations = match lookup_uniforms(gl, program) {
                Ok(l) => l,
                Err(e) => {
                    gl.delete_program(program);
                    return Err(e);
                }
            };
            let vertex_array = match gl.create_vertex_array() {
                Ok(vao) => vao,
                Err(e) => {
                    gl.delete_program(program);
                    return Err(RenderError::Resource(format!("vertex array: {e}")));
                }
            };
            debug!("Fractal program ready ({version_line})");
            Ok(Self {
                program,
                vertex_array,
                locations,
            })
        }
    }

    /// Upload the uniforms and draw the full-viewport quad.
    pub(crate) fn paint(
        &self,
        gl: &glow::Context,
        uniforms: &ViewportUniforms,
    ) -> shaderbrot_render::Result<()> {
        let [min_x, max_x, min_y, max_y] = uniforms.as_f32();
        // SAFETY: invoked from egui_glow's paint callback with the context current.
        unsafe {
            gl.use_program(Some(self.program));
            gl.uniform_1_f32(Some(&self.locations.min_x), min_x);
            gl.uniform_1_f32(Some(&self.locations.max_x), max_x);
            gl.uniform_1_f32(Some(&self.locations.min_y), min_y);
            gl.uniform_1_f32(Some(&self.locations.max_y), max_y);
            gl.uniform_1_u32(Some(&self.locations.iterations), uniforms.iterations);
            gl.bind_vertex_array(Some(self.vertex_array));
            gl.draw_arrays(glow::TRIANGLE_STRIP, 0, QUAD_VERTEX_COUNT);
            gl.bind_vertex_array(None);
            gl.use_program(None);

            let error = gl.get_error();
            if error != glow::NO_ERROR {
                return Err(RenderError::Resource(format!("GL error {error:#x} during draw")));
            }
        }
        Ok(())
    }

    pub(crate) fn destroy(&self, gl: &glow::Context) {
        // SAFETY: called from `on_exit` with the context still current.
        unsafe {
            gl.delete_program(self.program);
            gl.delete_vertex_array(self.vertex_array);
        }
        debug!("Fractal program destroyed");
    }
}

unsafe fn link_program(
    gl: &glow::Context,
    version_line: &str,
) -> shaderbrot_render::Result<glow::Program> {
    let program = gl
        .create_program()
        .map_err(|e| RenderError::Resource(format!("program: {e}")))?;

    let stages = [
        (glow::VERTEX_SHADER, "vertex", VERTEX_SHADER),
        (glow::FRAGMENT_SHADER, "fragment", FRAGMENT_SHADER),
    ];
    let mut shaders = Vec::with_capacity(stages.len());
    for (kind, stage, source) in stages {
        let compiled = compile_shader(gl, kind, stage, &shader::with_version(version_line, source));
        match compiled {
            Ok(s) => {
                gl.attach_shader(program, s);
                shaders.push(s);
            }
            Err(e) => {
                for s in shaders {
                    gl.detach_shader(program, s);
                    gl.delete_shader(s);
                }
                gl.delete_program(program);
                return Err(e);
            }
        }
    }

    gl.link_program(program);
    let linked = gl.get_program_link_status(program);
    let log = gl.get_program_info_log(program);

    for s in shaders {
        gl.detach_shader(program, s);
        gl.delete_shader(s);
    }

    if !linked {
        gl.delete_program(program);
        return Err(RenderError::ProgramLink(log));
    }
    Ok(program)
}

unsafe fn compile_shader(
    gl: &glow::Context,
    kind: u32,
    stage: &'static str,
    source: &str,
) -> shaderbrot_render::Result<glow::Shader> {
    let shader = gl
        .create_shader(kind)
        .map_err(|e| RenderError::Resource(format!("{stage} shader: {e}")))?;
    gl.shader_source(shader, source);
    gl.compile_shader(shader);
    if !gl.get_shader_compile_status(shader) {
        let log = gl.get_shader_info_log(shader);
        gl.delete_shader(shader);
        return Err(RenderError::ShaderCompile { stage, log });
    }
    Ok(shader)
}

unsafe fn lookup_uniforms(
    gl: &glow::Context,
    program: glow::Program,
) -> shaderbrot_render::Result<UniformLocations> {
    let find = |name: &str| {
        gl.get_uniform_location(program, name)
            .ok_or_else(|| RenderError::Resource(format!("uniform {name} not found")))
    };
    Ok(UniformLocations {
        min_x: find(UNIFORM_MIN_X)?,
        max_x: find(UNIFORM_MAX_X)?,
        min_y: find(UNIFORM_MIN_Y)?,
        max_y: find(UNIFORM_MAX_Y)?,
        iterations: find(UNIFORM_ITERATIONS)?,
    })
}
