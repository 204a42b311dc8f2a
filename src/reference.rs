use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
    str::FromStr,
};

use ndarray::Array1;

use crate::{
    config::SolarSource,
    error::{ReferenceLookupError, ReferenceReadError, Table},
    raw_tables::{
        RawTable, ATOMIC_NUMBERS, ATOMIC_NUMBERS_FILE, LODDERS03, LODDERS03_FILE,
        SOLAR_HEADER_LINES,
    },
};

fn parse_column<T: FromStr>(
    field: Option<&str>,
    line: usize,
    what: &str,
) -> Result<T, ReferenceReadError> {
    let field = field.ok_or_else(|| ReferenceReadError::Malformed {
        line,
        details: format!("missing {what}"),
    })?;
    field.parse().map_err(|_| ReferenceReadError::Malformed {
        line,
        details: format!("invalid {what} {field:?}"),
    })
}

/// Non-blank lines after `skip` header lines, with 1-based line numbers.
fn data_lines<R: BufRead>(
    reader: R,
    skip: usize,
) -> impl Iterator<Item = Result<(usize, String), ReferenceReadError>> {
    reader
        .lines()
        .enumerate()
        .skip(skip)
        .map(|(i, l)| l.map(|l| (i + 1, l)).map_err(ReferenceReadError::from))
        .filter(|l| !matches!(l, Ok((_, l)) if l.trim().is_empty()))
}

/// Atomic number of each element symbol, in table order.
#[derive(Debug, Clone)]
pub struct AtomicNumbers {
    entries: Vec<(String, u32)>,
}

impl AtomicNumbers {
    /// Read whitespace-delimited `<atomic number> <symbol>` lines.
    pub fn read_from<R: BufRead>(reader: R) -> Result<Self, ReferenceReadError> {
        let entries: Vec<(String, u32)> = data_lines(reader, 0)
            .map(|l| {
                let (line, text) = l?;
                let mut cols = text.split_whitespace();
                let num = parse_column(cols.next(), line, "atomic number")?;
                let sym = parse_column(cols.next(), line, "element symbol")?;
                Ok::<_, ReferenceReadError>((sym, num))
            })
            .collect::<Result<_, _>>()?;
        Ok(Self { entries })
    }

    pub fn get(&self, symbol: &str) -> Result<u32, ReferenceLookupError> {
        self.entries
            .iter()
            .find_map(|(s, z)| (s == symbol).then_some(*z))
            .ok_or_else(|| ReferenceLookupError {
                symbol: symbol.to_owned(),
                table: Table::AtomicNumber,
            })
    }

    pub fn symbols(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|(s, _)| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for AtomicNumbers {
    fn default() -> Self {
        (&ATOMIC_NUMBERS).into()
    }
}

/// Solar abundances on the `12 + log10(N_X / N_H)` scale.
#[derive(Debug, Clone)]
pub struct SolarAbundances {
    source: SolarSource,
    entries: Vec<(String, f64)>,
}

impl SolarAbundances {
    /// Read `<symbol> <abundance>` lines following the table header. Extra
    /// columns are ignored.
    pub fn read_from<R: BufRead>(
        source: SolarSource,
        reader: R,
    ) -> Result<Self, ReferenceReadError> {
        let entries: Vec<(String, f64)> = data_lines(reader, SOLAR_HEADER_LINES)
            .map(|l| {
                let (line, text) = l?;
                let mut cols = text.split_whitespace();
                let sym = parse_column(cols.next(), line, "element symbol")?;
                let ab = parse_column(cols.next(), line, "abundance")?;
                Ok::<_, ReferenceReadError>((sym, ab))
            })
            .collect::<Result<_, _>>()?;
        Ok(Self { source, entries })
    }

    /// Bundled table for `source`.
    pub fn bundled(source: SolarSource) -> Self {
        let raw: &RawTable = match source {
            SolarSource::Lodders => &LODDERS03,
        };
        Self::read_from(source, raw.0.as_bytes()).expect("bundled tables are well-formed")
    }

    pub fn source(&self) -> SolarSource {
        self.source
    }

    pub fn get(&self, symbol: &str) -> Result<f64, ReferenceLookupError> {
        self.entries
            .iter()
            .find_map(|(s, ab)| (s == symbol).then_some(*ab))
            .ok_or_else(|| ReferenceLookupError {
                symbol: symbol.to_owned(),
                table: Table::SolarAbundance,
            })
    }

    /// `[X/Fe]` of the Sun, `log10(N_X / N_Fe)`.
    pub fn fe_relative(&self, symbol: &str) -> Result<f64, ReferenceLookupError> {
        let x = self.get(symbol)?;
        let fe = self.get("Fe")?;
        Ok((10_f64.powf(x - 12.0) / 10_f64.powf(fe - 12.0)).log10())
    }
}

impl From<&RawTable> for AtomicNumbers {
    fn from(raw: &RawTable) -> Self {
        Self::read_from(raw.0.as_bytes()).expect("bundled tables are well-formed")
    }
}

/// Static reference data needed for abundances.
#[derive(Debug, Clone)]
pub struct ReferenceTables {
    atomic_numbers: AtomicNumbers,
    solar: SolarAbundances,
}

impl ReferenceTables {
    pub fn new(atomic_numbers: AtomicNumbers, solar: SolarAbundances) -> Self {
        Self {
            atomic_numbers,
            solar,
        }
    }

    /// Tables bundled with the crate.
    pub fn bundled(source: SolarSource) -> Self {
        Self::new(AtomicNumbers::default(), SolarAbundances::bundled(source))
    }

    /// Read the tables from the files of a data directory.
    pub fn from_dir<P: AsRef<Path>>(
        dir: P,
        source: SolarSource,
    ) -> Result<Self, ReferenceReadError> {
        let dir = dir.as_ref();
        let solar_name = match source {
            SolarSource::Lodders => LODDERS03_FILE,
        };
        let atomic_file = File::open(dir.join(ATOMIC_NUMBERS_FILE))?;
        let atomic_numbers = AtomicNumbers::read_from(BufReader::new(atomic_file))?;
        let solar_file = File::open(dir.join(solar_name))?;
        let solar = SolarAbundances::read_from(source, BufReader::new(solar_file))?;
        log::debug!(
            "read {} atomic numbers and {} solar abundances from {}",
            atomic_numbers.len(),
            solar.entries.len(),
            dir.display()
        );
        Ok(Self::new(atomic_numbers, solar))
    }

    pub fn atomic_numbers(&self) -> &AtomicNumbers {
        &self.atomic_numbers
    }

    pub fn solar(&self) -> &SolarAbundances {
        &self.solar
    }

    /// Restrict the solar abundances to `elements`, in that order.
    pub fn solar_reference<'a, I>(
        &self,
        elements: I,
    ) -> Result<SolarReference, ReferenceLookupError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let (solar_h, solar_fe): (Vec<f64>, Vec<f64>) = elements
            .into_iter()
            .map(|el| {
                let solar_h = self.solar.get(el)?;
                Ok::<_, ReferenceLookupError>((solar_h, self.solar.fe_relative(el)?))
            })
            .collect::<Result<Vec<(f64, f64)>, ReferenceLookupError>>()?
            .into_iter()
            .unzip();
        Ok(SolarReference {
            solar_h: Array1::from(solar_h),
            solar_fe: Array1::from(solar_fe),
        })
    }
}

impl Default for ReferenceTables {
    fn default() -> Self {
        Self::bundled(SolarSource::default())
    }
}

/// Solar values for the simulated elements, aligned with their order.
#[derive(Debug, Clone)]
pub struct SolarReference {
    /// `12 + log10(N_X / N_H)`
    pub solar_h: Array1<f64>,
    /// `log10(N_X / N_Fe)`
    pub solar_fe: Array1<f64>,
}
