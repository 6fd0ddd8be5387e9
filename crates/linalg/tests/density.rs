use linalg::{DensityMatrix, LinalgError, MatrixFile, C64};

fn ket(bits: usize, dim: usize) -> Vec<C64> {
    let mut v = vec![C64::new(0.0, 0.0); dim];
    v[bits] = C64::new(1.0, 0.0);
    v
}

#[test]
fn pure_state_has_rank_one() {
    let s = 1.0 / 2.0_f64.sqrt();
    let mut ghz = vec![C64::new(0.0, 0.0); 8];
    ghz[0] = C64::new(s, 0.0);
    ghz[7] = C64::new(s, 0.0);

    let rho = DensityMatrix::pure(&ghz).unwrap();
    assert!((rho.trace() - 1.0).abs() < 1e-12);
    assert!((rho.get(0, 7).re - 0.5).abs() < 1e-12);
    assert_eq!(rho.rank(1e-9), 1);
    rho.check_positive_semidefinite(1e-12).unwrap();
}

#[test]
fn mixture_is_positive_with_full_weight_spread() {
    let a = ket(0, 8);
    let b = ket(5, 8);
    let rho = DensityMatrix::mixture(&[(0.25, &a), (0.75, &b)]).unwrap();
    let ev = rho.eigenvalues();
    assert!((ev[7] - 0.75).abs() < 1e-10, "ev = {:?}", ev);
    assert!((ev[6] - 0.25).abs() < 1e-10, "ev = {:?}", ev);
    assert_eq!(rho.rank(1e-9), 2);
}

#[test]
fn rejects_non_hermitian() {
    let mut data = vec![C64::new(0.0, 0.0); 4];
    data[0] = C64::new(0.5, 0.0);
    data[3] = C64::new(0.5, 0.0);
    data[1] = C64::new(0.1, 0.0);
    let err = DensityMatrix::from_entries(2, data).unwrap_err();
    assert!(matches!(err, LinalgError::NotHermitian { row: 0, col: 1, .. }));
}

#[test]
fn rejects_bad_trace_and_shape() {
    let data = vec![C64::new(1.0, 0.0), C64::new(0.0, 0.0), C64::new(0.0, 0.0), C64::new(1.0, 0.0)];
    assert!(matches!(
        DensityMatrix::from_entries(2, data),
        Err(LinalgError::Trace(_))
    ));

    let rows = vec![vec![C64::new(1.0, 0.0)], vec![C64::new(0.0, 0.0), C64::new(0.0, 0.0)]];
    assert!(matches!(
        DensityMatrix::from_rows(rows),
        Err(LinalgError::NotSquare { .. })
    ));
}

#[test]
fn rejects_non_finite_entries() {
    let mut data = vec![C64::new(0.0, 0.0); 4];
    data[0] = C64::new(0.5, 0.0);
    data[3] = C64::new(f64::NAN, 0.0);
    assert_eq!(
        DensityMatrix::from_entries(2, data).unwrap_err(),
        LinalgError::NonFinite { row: 1, col: 1 }
    );

    let json = r#"{ "re": [[0.5, 0.0], [0.0, 0.5]], "im": [[0.0, 0.0], [0.0, 0.0]] }"#;
    let mut file: MatrixFile = serde_json::from_str(json).unwrap();
    file.re[1][1] = f64::NAN;
    assert!(matches!(
        file.clone().into_density(),
        Err(LinalgError::NonFinite { row: 1, col: 1 })
    ));
    file.re[1][1] = 0.5;
    file.im.as_mut().unwrap()[0][1] = f64::INFINITY;
    assert!(matches!(
        file.into_density(),
        Err(LinalgError::NonFinite { row: 0, col: 1 })
    ));
}

#[test]
fn rejects_negative_eigenvalue() {
    let data = vec![C64::new(1.5, 0.0), C64::new(0.0, 0.0), C64::new(0.0, 0.0), C64::new(-0.5, 0.0)];
    let rho = DensityMatrix::from_entries(2, data).unwrap();
    assert!(matches!(
        rho.check_positive_semidefinite(1e-9),
        Err(LinalgError::NotPositive(_))
    ));
}

#[test]
fn matrix_file_parses_real_only_json() {
    let json = r#"{ "re": [[0.5, 0.0], [0.0, 0.5]] }"#;
    let file: MatrixFile = serde_json::from_str(json).unwrap();
    let rho = file.into_density().unwrap();
    assert_eq!(rho.dim(), 2);
    assert_eq!(rho.get(1, 1), C64::new(0.5, 0.0));

    let back = MatrixFile::from_density(&rho);
    assert_eq!(back.re, vec![vec![0.5, 0.0], vec![0.0, 0.5]]);
}
