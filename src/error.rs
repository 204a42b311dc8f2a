use thiserror::Error;

/// An isotope label that is not an element symbol followed by a mass number.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("isotope label {label:?} is not of the form <element><mass number>")]
pub struct IsotopeParseError {
    pub label: String,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("solar abundance source {source_id:?} is not supported")]
pub struct UnsupportedSourceError {
    pub source_id: String,
}

/// Which reference table a lookup was made in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    AtomicNumber,
    SolarAbundance,
    Elements,
}

impl std::fmt::Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Table::AtomicNumber => "atomic number table",
            Table::SolarAbundance => "solar abundance table",
            Table::Elements => "simulated elements",
        })
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("element {symbol:?} is missing from the {table}")]
pub struct ReferenceLookupError {
    pub symbol: String,
    pub table: Table,
}

#[derive(Error, Debug)]
pub enum ReferenceReadError {
    #[error("failed to read reference table: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed reference table line {line}: {details}")]
    Malformed { line: usize, details: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShapeError {
    #[error("mass matrix has {found} isotope columns but {expected} isotopes were given")]
    IsotopeCount { expected: usize, found: usize },
    #[error("at least two timesteps are needed, found {0}")]
    TooFewSteps(usize),
    #[error("{found} solar abundances given for {expected} simulated elements")]
    SolarCount { expected: usize, found: usize },
}

#[derive(Error, Debug, Clone, PartialEq)]
#[error("abundance of {element} is not finite at timestep {step} ({value})")]
pub struct DegenerateAbundanceError {
    pub element: String,
    pub step: usize,
    pub value: f64,
}

#[derive(Error, Debug)]
pub enum AbundanceError {
    #[error(transparent)]
    Parse(#[from] IsotopeParseError),
    #[error(transparent)]
    UnsupportedSource(#[from] UnsupportedSourceError),
    #[error(transparent)]
    Lookup(#[from] ReferenceLookupError),
    #[error(transparent)]
    Read(#[from] ReferenceReadError),
    #[error(transparent)]
    Shape(#[from] ShapeError),
    #[error(transparent)]
    Degenerate(#[from] DegenerateAbundanceError),
}
