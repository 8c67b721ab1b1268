#![allow(non_snake_case)]

use conicls::{algebra::*, solver::*};

fn test_print_solver() -> DefaultSolver<f64> {
    let A = CscMatrix::from(&[[-1., 0.], [0., -1.]]);
    let b = [-1., -1.];
    let c = [1., 1.];
    let cones = [NonnegativeConeT(2)];
    let settings = DefaultSettingsBuilder::default()
        .verbose(true)
        .build()
        .unwrap();
    DefaultSolver::new(&A, &b, &c, &cones, settings).unwrap()
}

#[test]
fn test_print_to_stdout() {
    let mut solver = test_print_solver();
    solver.print_to_stdout();
    solver.solve().unwrap();
}

#[test]
fn test_print_to_buffer() {
    let mut solver = test_print_solver();
    solver.print_to_buffer();
    solver.solve().unwrap();
    let result = solver.get_print_buffer().unwrap();
    assert!(result.contains("conicls"));
    assert!(result.contains("NonnegativeCone") || result.contains("Nonnegative"));
    assert!(result.contains("Terminated with status = Solved"));
}

#[test]
fn test_quiet_buffer_is_empty() {
    let mut solver = test_print_solver();
    solver.settings.verbose = false;
    solver.print_to_buffer();
    solver.solve().unwrap();
    assert!(solver.get_print_buffer().unwrap().is_empty());
}

#[test]
fn test_print_to_file() {
    use std::io::{Read, Seek};

    let mut solver = test_print_solver();
    let file = tempfile::NamedTempFile::new().unwrap();
    let mut file2 = file.reopen().unwrap();
    solver.print_to_file(file.into_file());
    solver.solve().unwrap();

    file2.seek(std::io::SeekFrom::Start(0)).unwrap();
    let mut result = String::new();
    file2.read_to_string(&mut result).unwrap();
    assert!(result.contains("conicls"));
}

#[test]
fn test_print_to_stream() {
    use std::io::{Read, Seek};

    let mut solver = test_print_solver();
    let file = tempfile::NamedTempFile::new().unwrap();
    let mut file2 = file.reopen().unwrap();
    let stream = Box::new(file.into_file());

    solver.print_to_stream(stream);
    solver.solve().unwrap();

    file2.seek(std::io::SeekFrom::Start(0)).unwrap();
    let mut result = String::new();
    file2.read_to_string(&mut result).unwrap();
    assert!(result.contains("conicls"));
}
