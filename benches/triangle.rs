use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rasterrs::{
    Context, CullFace, FragmentShader, FsIn, FsOut, InterpolationMode, ShaderProgram, Topology,
    VaryingInfo, VertexBuffer, VertexShader, VsIn, VsOut,
};

struct Vertex {
    pos: [f32; 3],
    color: [f32; 3],
}

fn mesh(tris: usize) -> Vec<Vertex> {
    let mut verts = Vec::with_capacity(tris * 3);
    for i in 0..tris {
        let t = i as f32 * 0.001;
        verts.push(Vertex {
            pos: [-0.9 + t, -0.9, 0.0],
            color: [1.0, 0.0, 0.0],
        });
        verts.push(Vertex {
            pos: [0.9, -0.9 + t, 0.0],
            color: [0.0, 1.0, 0.0],
        });
        verts.push(Vertex {
            pos: [-0.1 + t, 0.9, 0.0],
            color: [0.0, 0.0, 1.0],
        });
    }
    verts
}

fn vertex_buffer(verts: &[Vertex]) -> VertexBuffer {
    let stride = std::mem::size_of::<Vertex>();
    let bytes = unsafe {
        std::slice::from_raw_parts(verts.as_ptr() as *const u8, verts.len() * stride)
    };
    VertexBuffer::copy_data(stride, bytes)
}

fn triangle_bench(c: &mut Criterion) {
    let mut fb = rasterrs::Framebuffer::new(256, 256);
    let mut ctx = Context::builder().cull_face(CullFace::None).build();

    let vert_shader: &VertexShader<()> = &|vs_in: VsIn<()>, out: &mut VsOut| {
        let v = unsafe { &*(vs_in.vertex.as_ptr() as *const Vertex) };
        out.position = [v.pos[0] as f64, v.pos[1] as f64, v.pos[2] as f64, 1.0];
        let varying = unsafe { out.varying_mut() };
        varying[0] = v.color[0] as f64;
        varying[1] = v.color[1] as f64;
        varying[2] = v.color[2] as f64;
    };
    let frag_shader: &FragmentShader<()> = &|fs_in: FsIn<()>| FsOut {
        color: [fs_in.interpolated[0], fs_in.interpolated[1], fs_in.interpolated[2], 1.0],
        frag_depth: f64::NAN,
    };
    let program = ShaderProgram::new((), vec![VaryingInfo::f64(3)], vert_shader, frag_shader);

    let verts = mesh(2000);
    let vb = vertex_buffer(&verts);

    c.bench_function("triangles_2000_perspective", |b| {
        b.iter(|| {
            ctx.set_interpolation_mode(InterpolationMode::Perspective);
            fb.clear();
            ctx.draw_vertex_buffer(&vb, &mut fb, &program, Topology::Triangles, 0, verts.len());
            black_box(&fb);
        })
    });
}

criterion_group!(benches, triangle_bench);
criterion_main!(benches);
