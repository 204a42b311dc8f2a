use std::{fmt, str::FromStr};

use crate::error::IsotopeParseError;

/// A nuclide identified by its element symbol and mass number, e.g. `Fe56`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Isotope {
    element: String,
    mass_number: u32,
}

impl Isotope {
    pub fn element(&self) -> &str {
        &self.element
    }

    pub fn mass_number(&self) -> u32 {
        self.mass_number
    }
}

impl FromStr for Isotope {
    type Err = IsotopeParseError;

    fn from_str(label: &str) -> Result<Self, Self::Err> {
        let err = || IsotopeParseError {
            label: label.to_owned(),
        };
        let split = label
            .find(|c: char| !c.is_ascii_alphabetic())
            .ok_or_else(err)?;
        let (element, digits) = label.split_at(split);
        if element.is_empty() || digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(err());
        }
        // a zero mass number would later divide the isotope mass by zero
        let mass_number = digits.parse().map_err(|_| err())?;
        if mass_number == 0 {
            return Err(err());
        }
        Ok(Self {
            element: element.to_owned(),
            mass_number,
        })
    }
}

impl fmt::Display for Isotope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.element, self.mass_number)
    }
}

/// Isotopes of one element, as positions in the isotope list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementGroup {
    pub symbol: String,
    pub indices: Vec<usize>,
}

/// Isotope list split into elements.
///
/// Groups are kept in order of first appearance in the isotope list, and
/// together they partition the isotope indices.
#[derive(Debug, Clone)]
pub struct IsotopeSet {
    isotopes: Vec<Isotope>,
    groups: Vec<ElementGroup>,
}

impl IsotopeSet {
    /// Parse all labels, failing on the first malformed one.
    pub fn from_labels<S: AsRef<str>>(labels: &[S]) -> Result<Self, IsotopeParseError> {
        let isotopes = labels
            .iter()
            .map(|l| l.as_ref().parse())
            .collect::<Result<Vec<Isotope>, _>>()?;
        Ok(Self::from_isotopes(isotopes))
    }

    pub fn from_isotopes(isotopes: Vec<Isotope>) -> Self {
        let mut groups: Vec<ElementGroup> = Vec::new();
        for (i, iso) in isotopes.iter().enumerate() {
            match groups.iter_mut().find(|g| g.symbol == iso.element) {
                Some(group) => group.indices.push(i),
                None => groups.push(ElementGroup {
                    symbol: iso.element.clone(),
                    indices: vec![i],
                }),
            }
        }
        Self { isotopes, groups }
    }

    pub fn isotopes(&self) -> &[Isotope] {
        &self.isotopes
    }

    pub fn n_isotopes(&self) -> usize {
        self.isotopes.len()
    }

    pub fn groups(&self) -> &[ElementGroup] {
        &self.groups
    }

    pub fn n_elements(&self) -> usize {
        self.groups.len()
    }

    /// Distinct element symbols in first-seen order.
    pub fn elements(&self) -> impl Iterator<Item = &str> + '_ {
        self.groups.iter().map(|g| g.symbol.as_str())
    }

    /// Row of `symbol` in per-element arrays.
    pub fn element_index(&self, symbol: &str) -> Option<usize> {
        self.groups.iter().position(|g| g.symbol == symbol)
    }

    pub fn indices_of(&self, symbol: &str) -> Option<&[usize]> {
        self.element_index(symbol)
            .map(|i| self.groups[i].indices.as_slice())
    }

    pub fn element_of(&self, index: usize) -> Option<&str> {
        self.isotopes.get(index).map(Isotope::element)
    }

    pub fn mass_numbers(&self) -> impl Iterator<Item = u32> + '_ {
        self.isotopes.iter().map(Isotope::mass_number)
    }
}

#[cfg(test)]
mod tests {
    use super::{Isotope, IsotopeSet};

    #[test]
    fn parse_labels() {
        let fe: Isotope = "Fe56".parse().expect("valid label");
        assert_eq!(fe.element(), "Fe");
        assert_eq!(fe.mass_number(), 56);
        assert_eq!(fe.to_string(), "Fe56");

        let h: Isotope = "h1".parse().expect("letters are case insensitive");
        assert_eq!(h.element(), "h");
        assert_eq!(h.mass_number(), 1);
    }

    #[test]
    fn reject_malformed_labels() {
        for label in ["", "Fe", "56", "Fe56m", "Fe-56", "56Fe", "Fe0", " Fe56"] {
            let err = label.parse::<Isotope>().expect_err(label);
            assert_eq!(err.label, label);
        }
    }

    #[test]
    fn group_by_element() {
        let set = IsotopeSet::from_labels(&["H1", "Fe56", "Fe58"]).expect("valid labels");
        assert_eq!(set.indices_of("H"), Some([0].as_slice()));
        assert_eq!(set.indices_of("Fe"), Some([1, 2].as_slice()));
        assert_eq!(set.indices_of("O"), None);
        assert_eq!(set.mass_numbers().collect::<Vec<_>>(), [1, 56, 58]);
    }

    #[test]
    fn elements_in_first_seen_order() {
        let labels = ["O16", "H1", "O18", "Fe56", "H2", "C12", "Fe54"];
        let set = IsotopeSet::from_labels(&labels).expect("valid labels");
        let expected: Vec<String> = labels.iter().fold(Vec::new(), |mut acc, l| {
            let el = l.trim_end_matches(|c: char| c.is_ascii_digit()).to_owned();
            if !acc.contains(&el) {
                acc.push(el);
            }
            acc
        });
        assert_eq!(set.elements().collect::<Vec<_>>(), expected);
        assert_eq!(set.element_index("Fe"), Some(2));
        assert_eq!(set.element_of(4), Some("H"));
    }

    #[test]
    fn groups_partition_indices() {
        let labels = ["O16", "H1", "O18", "Fe56", "H2", "C12", "Fe54", "O17"];
        let set = IsotopeSet::from_labels(&labels).expect("valid labels");
        let mut all: Vec<usize> = set
            .groups()
            .iter()
            .flat_map(|g| g.indices.iter().copied())
            .collect();
        all.sort_unstable();
        assert_eq!(all, (0..labels.len()).collect::<Vec<_>>());
    }

    #[test]
    fn first_bad_label_is_reported() {
        let err = IsotopeSet::from_labels(&["H1", "bogus", "Fe"]).expect_err("bad labels");
        assert_eq!(err.label, "bogus");
    }
}
