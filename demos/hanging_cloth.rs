use cloth_engine::*;

fn main() {
    let (cols, rows) = (10u32, 10u32);
    let mut vertices = Vec::new();
    for y in 0..rows {
        for x in 0..cols {
            vertices.push(Vec3::new(x as f32 * 0.1, 1.0 - y as f32 * 0.1, 0.0));
        }
    }
    let mut builder = PolygonMesh::builder(vertices);
    for y in 0..rows - 1 {
        for x in 0..cols - 1 {
            let i = y * cols + x;
            builder = builder.quad(i, i + 1, i + cols + 1, i + cols);
        }
    }
    let mesh = builder
        .vertex_group("pinned", (0..cols).collect())
        .build()
        .expect("grid mesh is valid");

    let config = ClothConfig::default()
        .with_stretch_limit(Some(1.1))
        .with_wind(true);
    let mut cloth = ClothSolver::with_config(&mesh, 10.0, config).expect("cloth builds");
    cloth.pin_group("pinned").expect("pinned group exists");

    let mut engine = ClothEngine::new(cloth);
    for frame in 0..120 {
        engine.advance(1.0 / 60.0);
        if frame % 30 == 0 {
            let bounds = engine.solver().bounds();
            println!("frame {frame}: bounds {:?} .. {:?}", bounds.min, bounds.max);
        }
    }

    let corner = engine.solver().export_positions()[(cols * rows - 1) as usize];
    println!("Bottom corner after two seconds: {corner:?}");
}
