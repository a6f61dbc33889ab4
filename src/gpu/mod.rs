//! GPU presentation of the software canvas.
//!
//! The particle field is painted on the CPU; the GPU side only uploads the
//! finished RGBA8 frame into a texture and draws it over the page background
//! with a single fullscreen triangle.

mod present;

pub use present::{BlitUniforms, Presenter};

/// Fullscreen blit: composite the straight-alpha canvas over the background.
///
/// Mixing happens on sRGB-encoded values, the way a browser composites a 2D
/// canvas. `encode_linear` is 1.0 when the surface format is sRGB and the
/// result must be handed over in linear space.
pub const BLIT_SHADER: &str = r#"
struct Blit {
    background: vec4<f32>,
    encode_linear: f32,
    _pad0: f32,
    _pad1: f32,
    _pad2: f32,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

@group(0) @binding(0)
var canvas: texture_2d<f32>;
@group(0) @binding(1)
var canvas_sampler: sampler;
@group(0) @binding(2)
var<uniform> blit: Blit;

@vertex
fn vs_main(@builtin(vertex_index) vertex_index: u32) -> VertexOutput {
    var positions = array<vec2<f32>, 3>(
        vec2<f32>(-1.0, -1.0),
        vec2<f32>(3.0, -1.0),
        vec2<f32>(-1.0, 3.0),
    );
    var uvs = array<vec2<f32>, 3>(
        vec2<f32>(0.0, 1.0),
        vec2<f32>(2.0, 1.0),
        vec2<f32>(0.0, -1.0),
    );

    var out: VertexOutput;
    out.clip_position = vec4<f32>(positions[vertex_index], 0.0, 1.0);
    out.uv = uvs[vertex_index];
    return out;
}

fn srgb_to_linear(c: vec3<f32>) -> vec3<f32> {
    let low = c / 12.92;
    let high = pow((c + vec3<f32>(0.055)) / 1.055, vec3<f32>(2.4));
    return select(high, low, c <= vec3<f32>(0.04045));
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let texel = textureSample(canvas, canvas_sampler, in.uv);
    var rgb = mix(blit.background.rgb, texel.rgb, texel.a);
    if blit.encode_linear > 0.5 {
        rgb = srgb_to_linear(rgb);
    }
    return vec4<f32>(rgb, 1.0);
}
"#;
