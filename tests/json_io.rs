#![allow(non_snake_case)]
#![cfg(feature = "serde")]

use conicls::{algebra::*, solver::*};
use std::io::{Seek, SeekFrom};

#[test]
fn test_json_roundtrip_solves_identically() {
    let _ = env_logger::builder().is_test(true).try_init();

    // min t  s.t.  u = (1, 2),  t >= ‖(2u1, u2)‖
    let A = CscMatrix::from(&[
        [0., 1., 0.],
        [0., 0., 1.],
        [-1., 0., 0.],
        [0., -1., 0.],
        [0., 0., -1.],
    ]);
    let b = vec![1., 2., 0., 0., 0.];
    let c = vec![1., 0., 0.];
    let cones = vec![ZeroConeT(2), SecondOrderConeT(vec![2., 1.])];

    let settings = DefaultSettingsBuilder::default()
        .line_search_method(LineSearchMethod::StrongWolfe)
        .build()
        .unwrap();
    let mut solver = DefaultSolver::new(&A, &b, &c, &cones, settings).unwrap();
    solver.solve().unwrap();

    let mut file = tempfile::tempfile().unwrap();
    solver.write_to_file(&mut file).unwrap();

    file.seek(SeekFrom::Start(0)).unwrap();
    let mut solver2 = DefaultSolver::<f64>::read_from_file(&mut file).unwrap();
    assert_eq!(solver2.settings, solver.settings);

    solver2.solve().unwrap();
    assert_eq!(solver.solution.x, solver2.solution.x);
}

#[test]
fn test_json_rejects_bad_problem() {
    use std::io::Write;

    // cone dimensions do not match the matrix
    let json = r#"{"A":{"m":1,"n":1,"colptr":[0,1],"rowval":[0],"nzval":[1.0]},
        "b":[1.0],"c":[1.0],"cones":[{"NonnegativeConeT":2}],"settings":{}}"#;
    let mut file = tempfile::tempfile().unwrap();
    file.write_all(json.as_bytes()).unwrap();
    file.seek(SeekFrom::Start(0)).unwrap();

    let err = DefaultSolver::<f64>::read_from_file(&mut file).err().unwrap();
    assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
}
