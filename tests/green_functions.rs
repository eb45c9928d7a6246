//! Tests of the Green's functions through the common interface
use approx::assert_relative_eq;
use bempp_hydro::green_functions::{
    Delhommeau, DelhommeauParameters, FinGreen3D, LiangWuNoblesseGF, HAMS,
};
use bempp_hydro::mesh::{MeshInput, PanelMesh};
use bempp_hydro::shapes::{horizontal_plate, sphere};
use bempp_hydro::traits::{GreenFunction, MeshLike};
use bempp_hydro::types::Error;
use cauchy::c64;
use paste::paste;
use rlst::{rlst_dynamic_array2, RandomAccessByRef, RandomAccessMut, Shape};

extern crate blas_src;
extern crate lapack_src;

fn small_delhommeau() -> Delhommeau {
    Delhommeau::new(DelhommeauParameters {
        tabulation_nr: 101,
        tabulation_rmax: 20.0,
        tabulation_nz: 101,
        tabulation_zmin: -20.0,
        ..Default::default()
    })
    .unwrap()
}

macro_rules! create_green_function {
    (Delhommeau) => {
        small_delhommeau()
    };
    (FinGreen3D) => {
        FinGreen3D::new(f64::INFINITY)
    };
    (LiangWuNoblesseGF) => {
        LiangWuNoblesseGF::new()
    };
    (HAMS) => {
        HAMS::default()
    };
}

fn floating_body() -> PanelMesh {
    sphere(4, 6, 1.0, [0.0, 0.0, -2.0])
}

fn point_array(points: &[[f64; 3]]) -> rlst::DynamicArray<f64, 2> {
    let mut array = rlst_dynamic_array2!(f64, [points.len(), 3]);
    for (i, p) in points.iter().enumerate() {
        for (j, x) in p.iter().enumerate() {
            *array.get_mut([i, j]).unwrap() = *x;
        }
    }
    array
}

macro_rules! test_green_function {
    ($($gf:ident),+) => {
        $(
            paste! {
                #[test]
                fn [<test_shapes_ $gf:lower>]() {
                    let mesh1 = horizontal_plate(3, 2, 0.5, -1.0);
                    let mesh2 = floating_body();
                    let mut gf = create_green_function!($gf);
                    for adjoint in [true, false] {
                        for early in [true, false] {
                            let (s, k) = gf
                                .evaluate(
                                    &MeshInput::from(&mesh1),
                                    &MeshInput::from(&mesh2),
                                    0.0,
                                    f64::INFINITY,
                                    c64::new(1.2, 0.0),
                                    adjoint,
                                    early,
                                )
                                .unwrap();
                            let width = if early { 1 } else { 3 };
                            assert_eq!(s.shape(), [6, 24]);
                            assert_eq!(k.shape(), [6, 24 * width]);
                            for i in 0..6 {
                                for j in 0..24 * width {
                                    assert!(k.get([i, j]).unwrap().is_finite());
                                }
                            }
                        }
                    }
                }

                #[test]
                fn [<test_symmetry_ $gf:lower>]() {
                    let mesh = floating_body();
                    let n = mesh.nb_faces();
                    let mut gf = create_green_function!($gf);
                    let (s, _) = gf
                        .evaluate(
                            &MeshInput::from(&mesh),
                            &MeshInput::from(&mesh),
                            0.0,
                            f64::INFINITY,
                            c64::new(0.8, 0.0),
                            true,
                            true,
                        )
                        .unwrap();
                    for i in 0..n {
                        for j in 0..n {
                            let a = s.get([i, j]).unwrap();
                            let b = s.get([j, i]).unwrap();
                            assert!(a.is_finite());
                            assert_relative_eq!(a.re, b.re, max_relative = 1e-12);
                            assert_relative_eq!(a.im, b.im, epsilon = 1e-12);
                        }
                    }
                }

                #[test]
                fn [<test_gradient_ $gf:lower>]() {
                    let mesh = floating_body();
                    let n = mesh.nb_faces();
                    let x = [0.3, -0.4, -0.6];
                    let eps = 1e-6;
                    let mut gf = create_green_function!($gf);

                    let mut evaluate = |p: [f64; 3]| {
                        let points = point_array(&[p]);
                        gf.evaluate(
                            &MeshInput::from(&points),
                            &MeshInput::from(&mesh),
                            0.0,
                            f64::INFINITY,
                            c64::new(1.0, 0.0),
                            true,
                            false,
                        )
                        .unwrap()
                    };

                    let (_, k) = evaluate(x);
                    for c in 0..3 {
                        let mut xp = x;
                        let mut xm = x;
                        xp[c] += eps;
                        xm[c] -= eps;
                        let (sp, _) = evaluate(xp);
                        let (sm, _) = evaluate(xm);
                        for j in 0..n {
                            let fd = (*sp.get([0, j]).unwrap() - *sm.get([0, j]).unwrap())
                                / (2.0 * eps);
                            let g = *k.get([0, 3 * j + c]).unwrap();
                            assert_relative_eq!(g.re, fd.re, epsilon = 1e-5, max_relative = 1e-5);
                        }
                    }
                }

                #[test]
                fn [<test_rejects_invalid_parameters_ $gf:lower>]() {
                    let mesh = horizontal_plate(2, 1, 1.0, -1.0);
                    let points = point_array(&[[0.0, 0.0, -1.0]]);
                    let mut gf = create_green_function!($gf);
                    let k = c64::new(1.0, 0.0);

                    let result = gf.evaluate(
                        &MeshInput::from(&mesh),
                        &MeshInput::from(&mesh),
                        1.0,
                        f64::INFINITY,
                        k,
                        true,
                        true,
                    );
                    assert!(matches!(result, Err(Error::DomainConstraint(_))));

                    let result = gf.evaluate(
                        &MeshInput::from(&mesh),
                        &MeshInput::from(&mesh),
                        0.0,
                        -1.0,
                        k,
                        true,
                        true,
                    );
                    assert!(matches!(result, Err(Error::DomainConstraint(_))));

                    let result = gf.evaluate(
                        &MeshInput::from(&mesh),
                        &MeshInput::from(&points),
                        0.0,
                        f64::INFINITY,
                        k,
                        true,
                        true,
                    );
                    assert!(matches!(result, Err(Error::TypeMismatch(_))));

                    let narrow = rlst_dynamic_array2!(f64, [2, 2]);
                    let result = gf.evaluate(
                        &MeshInput::from(&narrow),
                        &MeshInput::from(&mesh),
                        0.0,
                        f64::INFINITY,
                        k,
                        true,
                        true,
                    );
                    assert!(matches!(result, Err(Error::Dimension(_))));

                    let empty = PanelMesh::new(vec![], vec![]).unwrap();
                    let result = gf.evaluate(
                        &MeshInput::from(&empty),
                        &MeshInput::from(&mesh),
                        0.0,
                        f64::INFINITY,
                        k,
                        true,
                        true,
                    );
                    assert!(matches!(result, Err(Error::Dimension(_))));
                }

                #[test]
                fn [<test_hash_ $gf:lower>]() {
                    let a = create_green_function!($gf);
                    let b = create_green_function!($gf);
                    assert_eq!(a.settings_hash(), b.settings_hash());
                    assert_eq!(a.to_string(), b.to_string());
                    assert!(a.to_string().starts_with(stringify!($gf)));
                }
            }
        )*
    };
}

test_green_function!(Delhommeau, FinGreen3D, LiangWuNoblesseGF, HAMS);

#[test]
fn test_liang_wu_noblesse_domain() {
    let mesh = horizontal_plate(2, 1, 1.0, -1.0);
    let mut gf = LiangWuNoblesseGF::new();
    let k = c64::new(1.0, 0.0);
    let mut evaluate = |free_surface: f64, water_depth: f64| {
        gf.evaluate(
            &MeshInput::from(&mesh),
            &MeshInput::from(&mesh),
            free_surface,
            water_depth,
            k,
            true,
            true,
        )
    };
    assert!(matches!(
        evaluate(f64::INFINITY, f64::INFINITY),
        Err(Error::DomainConstraint(_))
    ));
    assert!(matches!(
        evaluate(0.0, 10.0),
        Err(Error::DomainConstraint(_))
    ));
    assert!(evaluate(0.0, f64::INFINITY).is_ok());
}

#[test]
fn test_two_panels_delhommeau_and_liang_wu_noblesse() {
    let mesh = PanelMesh::new(
        vec![[0.0, 0.0, -1.0], [1.0, 0.0, -1.0]],
        vec![[0.0, 0.0, 1.0], [0.0, 0.0, 1.0]],
    )
    .unwrap();
    let k = c64::new(1.0, 0.0);

    let mut delhommeau = Delhommeau::new(DelhommeauParameters::default()).unwrap();
    let mut lwn = LiangWuNoblesseGF::new();
    let mut results = vec![];
    for gf in [&mut delhommeau as &mut dyn GreenFunction, &mut lwn] {
        results.push(
            gf.evaluate(
                &MeshInput::from(&mesh),
                &MeshInput::from(&mesh),
                0.0,
                f64::INFINITY,
                k,
                true,
                true,
            )
            .unwrap(),
        );
    }
    for (s, kmat) in &results {
        assert_eq!(s.shape(), [2, 2]);
        assert_eq!(kmat.shape(), [2, 2]);
    }
    // Both use the same closed form in deep water, up to the tabulation error.
    let (s_delhommeau, _) = &results[0];
    let (s_lwn, _) = &results[1];
    assert_relative_eq!(
        s_delhommeau.get([0, 1]).unwrap().re,
        s_lwn.get([0, 1]).unwrap().re,
        max_relative = 1e-2
    );
}

#[test]
fn test_fingreen3d_follows_requested_depth() {
    let mesh = horizontal_plate(2, 2, 1.0, -1.0);
    let k = c64::new(1.5, 0.0);
    let mut gf = FinGreen3D::new(f64::INFINITY);
    assert_eq!(gf.dispersion_roots().len(), 1);

    let (s, _) = gf
        .evaluate(
            &MeshInput::from(&mesh),
            &MeshInput::from(&mesh),
            0.0,
            20.0,
            k,
            true,
            true,
        )
        .unwrap();
    assert_eq!(s.shape(), [4, 4]);
    assert_eq!(gf.water_depth(), 20.0);
    assert_eq!(gf.wavenumber(), k);
    assert_eq!(gf.dispersion_roots().len(), 11);
    assert_eq!(gf.to_string(), "FinGreen3D(water_depth=20.00)");

    gf.evaluate(
        &MeshInput::from(&mesh),
        &MeshInput::from(&mesh),
        0.0,
        f64::INFINITY,
        k,
        true,
        true,
    )
    .unwrap();
    assert_eq!(gf.dispersion_roots().len(), 1);
}
