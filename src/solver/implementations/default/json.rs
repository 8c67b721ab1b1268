use crate::{
    algebra::*,
    solver::{DefaultSettings, DefaultSolver, SolverError, SupportedConeT},
};

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::io::Write;
use std::{fs::File, io, io::Read};

// the problem as provided by the user, plus settings

#[derive(Serialize, Deserialize)]
#[serde(bound = "T: Serialize + DeserializeOwned")]
struct JsonProblemData<T: FloatT> {
    pub A: CscMatrix<T>,
    pub b: Vec<T>,
    pub c: Vec<T>,
    pub cones: Vec<SupportedConeT<T>>,
    pub settings: DefaultSettings<T>,
}

/// Reading and writing of problems in JSON format
pub trait SolverJSONReadWrite: Sized {
    /// write the problem data and settings to a file
    fn write_to_file(&self, file: &mut File) -> Result<(), io::Error>;
    /// create a solver from a problem file
    fn read_from_file(file: &mut File) -> Result<Self, io::Error>;
}

impl<T> SolverJSONReadWrite for DefaultSolver<T>
where
    T: FloatT + DeserializeOwned + Serialize,
{
    fn write_to_file(&self, file: &mut File) -> Result<(), io::Error> {
        let mut json_data = JsonProblemData {
            A: self.user.A.clone(),
            b: self.user.b.clone(),
            c: self.user.c.clone(),
            cones: self.user.cones.clone(),
            settings: self.settings.clone(),
        };

        // infinite values can't be represented in json
        sanitize_settings(&mut json_data.settings);

        let json = serde_json::to_string(&json_data)?;
        file.write_all(json.as_bytes())?;

        Ok(())
    }

    fn read_from_file(file: &mut File) -> Result<Self, io::Error> {
        let mut buffer = String::new();
        file.read_to_string(&mut buffer)?;
        let mut json_data: JsonProblemData<T> = serde_json::from_str(&buffer)?;

        // restore sanitized settings to their (likely) original values
        desanitize_settings(&mut json_data.settings);

        let JsonProblemData {
            A,
            b,
            c,
            cones,
            settings,
        } = json_data;

        Self::new(&A, &b, &c, &cones, settings).map_err(into_io_error)
    }
}

fn into_io_error(e: SolverError) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, e)
}

fn sanitize_settings<T: FloatT>(settings: &mut DefaultSettings<T>) {
    if settings.time_limit == f64::INFINITY {
        settings.time_limit = f64::MAX;
    }
}

fn desanitize_settings<T: FloatT>(settings: &mut DefaultSettings<T>) {
    if settings.time_limit == f64::MAX {
        settings.time_limit = f64::INFINITY;
    }
}

#[test]
fn test_json_io() {
    use crate::solver::SupportedConeT::*;
    use std::io::{Seek, SeekFrom};

    // min x1 + x2  s.t.  x1 + x2 = 2, x >= 0.5
    let A = CscMatrix::from(&[[1., 1.], [-1., 0.], [0., -1.]]);
    let b = [2., -0.5, -0.5];
    let c = [1., 1.];
    let cones = vec![ZeroConeT(1), NonnegativeConeT(2)];

    let settings = crate::solver::DefaultSettingsBuilder::default()
        .time_limit(f64::INFINITY)
        .build()
        .unwrap();

    let solver = DefaultSolver::<f64>::new(&A, &b, &c, &cones, settings).unwrap();

    let mut file = tempfile::tempfile().unwrap();
    solver.write_to_file(&mut file).unwrap();

    file.seek(SeekFrom::Start(0)).unwrap();
    let solver2 = DefaultSolver::<f64>::read_from_file(&mut file).unwrap();

    assert_eq!(solver2.user.A, A);
    assert_eq!(solver2.user.b, b.to_vec());
    assert_eq!(solver2.user.cones, cones);
    assert_eq!(solver2.settings, solver.settings);
    assert!(solver2.settings.time_limit.is_infinite());
}
