//! The fractal program: GLSL sources for the GPU path and a CPU mirror of
//! the fragment stage used by the software backend.
//!
//! Sources carry no `#version` line; the GPU backend prepends one that
//! matches the context (desktop GL 3.3 core or GLES 3.0).

/// Uniform names shared by the GLSL sources and the GPU backend.
pub const UNIFORM_MIN_X: &str = "u_min_x";
pub const UNIFORM_MAX_X: &str = "u_max_x";
pub const UNIFORM_MIN_Y: &str = "u_min_y";
pub const UNIFORM_MAX_Y: &str = "u_max_y";
pub const UNIFORM_ITERATIONS: &str = "u_iterations";

/// Vertices emitted per draw (one triangle strip covering the viewport).
pub const QUAD_VERTEX_COUNT: i32 = 4;

/// Full-viewport quad generated from `gl_VertexID`; no vertex buffer needed.
pub const VERTEX_SHADER: &str = r#"
const vec2 CORNERS[4] = vec2[4](
    vec2(-1.0, -1.0),
    vec2( 1.0, -1.0),
    vec2(-1.0,  1.0),
    vec2( 1.0,  1.0)
);

out vec2 v_uv;

void main() {
    vec2 corner = CORNERS[gl_VertexID];
    v_uv = corner * 0.5 + 0.5;
    gl_Position = vec4(corner, 0.0, 1.0);
}
"#;

/// Escape-time iteration over the rectangle `[u_min_x, u_max_x] × [u_min_y, u_max_y]`.
pub const FRAGMENT_SHADER: &str = r#"
precision highp float;
precision highp int;

uniform float u_min_x;
uniform float u_max_x;
uniform float u_min_y;
uniform float u_max_y;
uniform uint u_iterations;

in vec2 v_uv;
out vec4 out_color;

vec3 palette(float t) {
    return 0.5 + 0.5 * cos(6.2831853 * (t + vec3(0.0, 0.33, 0.67)));
}

void main() {
    vec2 c = vec2(mix(u_min_x, u_max_x, v_uv.x), mix(u_min_y, u_max_y, v_uv.y));
    vec2 z = vec2(0.0);
    uint n = 0u;
    while (n < u_iterations && dot(z, z) <= 4.0) {
        z = vec2(z.x * z.x - z.y * z.y, 2.0 * z.x * z.y) + c;
        n++;
    }
    if (n == u_iterations) {
        out_color = vec4(0.0, 0.0, 0.0, 1.0);
    } else {
        out_color = vec4(palette(float(n) / float(u_iterations)), 1.0);
    }
}
"#;

/// Prefix a source with the given `#version` line.
pub fn with_version(version_line: &str, source: &str) -> String {
    format!("{version_line}\n{source}")
}

/// Number of iterations before `z ← z² + c` leaves the radius-2 disc,
/// or `max_iterations` if it never does.
#[inline]
pub fn escape_time(cx: f64, cy: f64, max_iterations: u32) -> u32 {
    let (mut x, mut y) = (0.0f64, 0.0f64);
    let mut n = 0;
    while n < max_iterations && x * x + y * y <= 4.0 {
        let xt = x * x - y * y + cx;
        y = 2.0 * x * y + cy;
        x = xt;
        n += 1;
    }
    n
}

/// RGBA colour for an escape count; interior points are opaque black.
#[inline]
pub fn shade(n: u32, max_iterations: u32) -> [u8; 4] {
    if n >= max_iterations {
        return [0, 0, 0, 255];
    }
    let t = n as f32 / max_iterations as f32;
    let channel = |phase: f32| {
        let v = 0.5 + 0.5 * (std::f32::consts::TAU * (t + phase)).cos();
        (v * 255.0).round().clamp(0.0, 255.0) as u8
    };
    [channel(0.0), channel(0.33), channel(0.67), 255]
}
