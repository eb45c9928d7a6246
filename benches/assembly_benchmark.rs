use bempp_hydro::green_functions::{
    Delhommeau, DelhommeauParameters, FinGreen3D, LiangWuNoblesseGF, HAMS,
};
use bempp_hydro::mesh::MeshInput;
use bempp_hydro::shapes::sphere;
use bempp_hydro::traits::{GreenFunction, MeshLike};
use cauchy::c64;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

extern crate blas_src;
extern crate lapack_src;

pub fn assembly_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("assembly");
    group.sample_size(20);

    let wavenumber = c64::new(1.0, 0.0);
    let mut green_functions: Vec<Box<dyn GreenFunction>> = vec![
        Box::new(Delhommeau::new(DelhommeauParameters::default()).unwrap()),
        Box::new(LiangWuNoblesseGF::new()),
        Box::new(HAMS::default()),
        Box::new(FinGreen3D::new(f64::INFINITY)),
    ];

    for n in [8, 16] {
        let mesh = sphere(n, 2 * n, 1.0, [0.0, 0.0, -2.0]);
        for gf in green_functions.iter_mut() {
            group.bench_function(
                format!(
                    "Assembly of {}x{} matrices with {}",
                    mesh.nb_faces(),
                    mesh.nb_faces(),
                    gf
                ),
                |b| {
                    b.iter(|| {
                        black_box(
                            gf.evaluate(
                                &MeshInput::from(&mesh),
                                &MeshInput::from(&mesh),
                                0.0,
                                f64::INFINITY,
                                wavenumber,
                                true,
                                false,
                            )
                            .unwrap(),
                        )
                    })
                },
            );
        }
    }
    group.finish();
}

pub fn finite_depth_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("finite_depth");
    group.sample_size(20);

    let mesh = sphere(8, 16, 1.0, [0.0, 0.0, -2.0]);
    let mut gf = FinGreen3D::new(10.0);
    group.bench_function(
        format!("FinGreen3D assembly of {}x{} matrices", mesh.nb_faces(), mesh.nb_faces()),
        |b| {
            b.iter(|| {
                black_box(
                    gf.evaluate(
                        &MeshInput::from(&mesh),
                        &MeshInput::from(&mesh),
                        0.0,
                        10.0,
                        c64::new(0.5, 0.0),
                        true,
                        true,
                    )
                    .unwrap(),
                )
            })
        },
    );
    group.finish();
}

criterion_group!(benches, assembly_benchmark, finite_depth_benchmark);
criterion_main!(benches);
