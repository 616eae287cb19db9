/// WGSL shader for the matcap-shaded ripple plane.
///
/// The vertex stage consumes positions already displaced on the CPU plus the
/// raw per-vertex offset. The facing vector fed to the matcap basis is
/// `(-mv.x, -mv.y * offset, -mv.z)`: y scaled by the offset, x and z negated.
pub const PLANE_SHADER: &str = r#"
struct Uniforms {
    view_proj: mat4x4<f32>,
    model: mat4x4<f32>,
    view: mat4x4<f32>,
    shading: vec4<u32>, // x: 1 = faceted normals
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

@group(1) @binding(0)
var matcap_tex: texture_2d<f32>;
@group(1) @binding(1)
var matcap_samp: sampler;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) offset: f32,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) view_normal: vec3<f32>,
    @location(1) view_pos: vec3<f32>,
    @location(2) facing: vec3<f32>,
};

@vertex
fn vs_main(vertex: VertexInput) -> VertexOutput {
    let world_pos = uniforms.model * vec4<f32>(vertex.position, 1.0);
    let mv = uniforms.view * world_pos;

    var out: VertexOutput;
    out.clip_position = uniforms.view_proj * world_pos;
    out.view_normal = (uniforms.view * uniforms.model * vec4<f32>(vertex.normal, 0.0)).xyz;
    out.view_pos = mv.xyz;
    out.facing = vec3<f32>(-mv.x, -mv.y * vertex.offset, -mv.z);
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    var normal = normalize(in.view_normal);
    if (uniforms.shading.x != 0u) {
        normal = normalize(cross(dpdy(in.view_pos), dpdx(in.view_pos)));
    }

    let view_dir = normalize(in.facing);
    let x_axis = normalize(vec3<f32>(view_dir.z, 0.0, -view_dir.x));
    let y_axis = cross(view_dir, x_axis);
    let m_uv = vec2<f32>(dot(x_axis, normal), dot(y_axis, normal)) * 0.495 + 0.5;
    let color = textureSample(matcap_tex, matcap_samp, vec2<f32>(m_uv.x, 1.0 - m_uv.y));
    return vec4<f32>(color.rgb, 1.0);
}
"#;
