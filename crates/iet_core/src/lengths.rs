use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::label::Label;
use crate::ring::Ring;
use std::cmp::Ordering;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Entry<R> {
    label: Label,
    name: String,
    value: R,
}

/// The lengths backing the intervals of one or more transformations.
///
/// Labels themselves are opaque; this container maps each tracked label to
/// its current length and to a stable display name. When a transformation
/// splits, the pieces keep their labels and the restricted copies produced by
/// [`Lengths::only`] keep the original names, so renderings stay consistent
/// across a whole decomposition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lengths<R: Ring> {
    entries: Vec<Entry<R>>,
    next_name: usize,
}

impl<R: Ring> Lengths<R> {
    /// Tracks one fresh label per value, in input order.
    ///
    /// Labels are numbered from zero so that two transformations built from
    /// equal data compare equal. Fails unless every value is strictly
    /// positive.
    pub fn new(values: Vec<R>) -> Result<Self> {
        if values.is_empty() {
            return Err(Error::InvalidLengths("no lengths given".to_string()));
        }
        let mut lengths = Lengths {
            entries: Vec::with_capacity(values.len()),
            next_name: 0,
        };
        for (id, value) in values.into_iter().enumerate() {
            lengths.insert(Label::from_id(id), value)?;
        }
        Ok(lengths)
    }

    /// The current length of `label`.
    pub fn get(&self, label: Label) -> Result<&R> {
        self.entry(label).map(|entry| &entry.value)
    }

    /// All tracked labels, in underlying order.
    pub fn labels(&self) -> Vec<Label> {
        self.entries.iter().map(|entry| entry.label).collect()
    }

    /// The display name of `label`.
    ///
    /// Names are sequential letters in creation order, `a` through `z` and
    /// then spreadsheet style `aa`, `ab`, …; they never change for the
    /// lifetime of the container and survive [`Lengths::only`].
    pub fn render(&self, label: Label) -> Result<String> {
        self.entry(label).map(|entry| entry.name.clone())
    }

    /// Adds `value` to the length of `label`, tracking the label first if it
    /// is new. The added value must be strictly positive.
    pub fn push(&mut self, label: Label, value: R) -> Result<()> {
        if !value.is_positive() {
            return Err(Error::NegativeLength(format!(
                "cannot push non-positive length {value} for {label:?}"
            )));
        }
        match self.entries.iter_mut().find(|entry| entry.label == label) {
            Some(entry) => {
                entry.value = entry.value.add(&value)?;
                Ok(())
            }
            None => self.insert(label, value),
        }
    }

    /// Stops tracking `label` and returns its final length.
    pub fn pop(&mut self, label: Label) -> Result<R> {
        let at = self.position(label)?;
        Ok(self.entries.remove(at).value)
    }

    /// Subtracts the length of `b` from the length of `a` once.
    ///
    /// Fails with [`Error::NegativeLength`] when the difference would not be
    /// strictly positive; the container is unchanged in that case.
    pub fn subtract(&mut self, a: Label, b: Label) -> Result<()> {
        let lb = self.get(b)?.clone();
        let la = self.get(a)?;
        let difference = la.sub(&lb)?;
        if !difference.is_positive() {
            return Err(Error::NegativeLength(format!(
                "subtracting {lb} from {la} leaves no positive length"
            )));
        }
        self.entry_mut(a)?.value = difference;
        Ok(())
    }

    /// One accelerated Euclidean step: subtracts as many whole multiples of
    /// `b`'s length from `a`'s length as keep `a` strictly positive, and
    /// returns how many were subtracted.
    pub fn subtract_repeated(&mut self, a: Label, b: Label) -> Result<BigUint> {
        let lb = self.get(b)?.clone();
        self.subtract_value_repeated(a, &lb)
    }

    /// Compares the lengths of `a` and `b`.
    pub fn cmp(&self, a: Label, b: Label) -> Result<Ordering> {
        self.get(a)?.cmp(self.get(b)?)
    }

    /// Whether the lengths of `a` and `b` differ by at most `tolerance`.
    pub fn similar(&self, a: Label, b: Label, tolerance: &R) -> Result<bool> {
        let la = self.get(a)?;
        let lb = self.get(b)?;
        let difference = match la.cmp(lb)? {
            Ordering::Less => lb.sub(la)?,
            _ => la.sub(lb)?,
        };
        Ok(difference.cmp(tolerance)? != Ordering::Greater)
    }

    /// Whether the ratio of `a` to `b` here equals the ratio of `aa` to
    /// `bb` in `other`, decided exactly by cross multiplication.
    pub fn same_ratio(
        &self,
        a: Label,
        b: Label,
        other: &Lengths<R>,
        aa: Label,
        bb: Label,
    ) -> Result<bool> {
        let left = self.get(a)?.mul(other.get(bb)?)?;
        let right = self.get(b)?.mul(other.get(aa)?)?;
        Ok(left == right)
    }

    /// A copy restricted to `labels`, keeping values, names and underlying
    /// order.
    pub fn only(&self, labels: &[Label]) -> Result<Self> {
        for &label in labels {
            self.position(label)?;
        }
        Ok(Lengths {
            entries: self
                .entries
                .iter()
                .filter(|entry| labels.contains(&entry.label))
                .cloned()
                .collect(),
            next_name: self.next_name,
        })
    }

    /// Stops tracking every label in `labels`.
    pub fn forget(&mut self, labels: &[Label]) -> Result<()> {
        for &label in labels {
            self.position(label)?;
        }
        self.entries.retain(|entry| !labels.contains(&entry.label));
        Ok(())
    }

    /// The sum of all tracked lengths.
    pub fn total(&self) -> Result<R> {
        let mut sum = R::zero();
        for entry in &self.entries {
            sum = sum.add(&entry.value)?;
        }
        Ok(sum)
    }

    pub(crate) fn subtract_value_repeated(&mut self, label: Label, value: &R) -> Result<BigUint> {
        if !value.is_positive() {
            return Err(Error::NegativeLength(format!(
                "cannot subtract multiples of the non-positive length {value}"
            )));
        }
        let current = self.get(label)?;
        let (quotient, remainder) = current.floor_div(value)?;
        if remainder.is_positive() {
            self.entry_mut(label)?.value = remainder;
            Ok(quotient)
        } else {
            // Exact multiple; stop one step short so the length stays
            // positive.
            self.entry_mut(label)?.value = value.clone();
            Ok(quotient - 1u32)
        }
    }

    pub(crate) fn subtract_value(&mut self, label: Label, value: &R) -> Result<()> {
        let current = self.get(label)?;
        let difference = current.sub(value)?;
        if !difference.is_positive() {
            return Err(Error::NegativeLength(format!(
                "subtracting {value} from {current} leaves no positive length"
            )));
        }
        self.entry_mut(label)?.value = difference;
        Ok(())
    }

    fn insert(&mut self, label: Label, value: R) -> Result<()> {
        if !value.is_positive() {
            return Err(Error::InvalidLengths(format!(
                "length {value} for {label:?} is not strictly positive"
            )));
        }
        let name = letter_name(self.next_name);
        self.next_name += 1;
        self.entries.push(Entry { label, name, value });
        Ok(())
    }

    fn entry(&self, label: Label) -> Result<&Entry<R>> {
        self.entries
            .iter()
            .find(|entry| entry.label == label)
            .ok_or(Error::UnknownLabel(label))
    }

    fn entry_mut(&mut self, label: Label) -> Result<&mut Entry<R>> {
        self.entries
            .iter_mut()
            .find(|entry| entry.label == label)
            .ok_or(Error::UnknownLabel(label))
    }

    fn position(&self, label: Label) -> Result<usize> {
        self.entries
            .iter()
            .position(|entry| entry.label == label)
            .ok_or(Error::UnknownLabel(label))
    }
}

fn letter_name(mut index: usize) -> String {
    let mut letters = Vec::new();
    loop {
        letters.push(b'a' + (index % 26) as u8);
        index /= 26;
        if index == 0 {
            break;
        }
        index -= 1;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lengths(values: &[i64]) -> Lengths<i64> {
        Lengths::new(values.to_vec()).expect("positive lengths")
    }

    #[test]
    fn rejects_empty_and_non_positive_input() {
        assert!(Lengths::<i64>::new(vec![]).is_err());
        assert!(Lengths::new(vec![1, 0, 2]).is_err());
        assert!(Lengths::new(vec![1, -3]).is_err());
    }

    #[test]
    fn tracks_labels_in_input_order() {
        let lengths = lengths(&[18, 3]);
        let labels = lengths.labels();
        assert_eq!(labels.len(), 2);
        assert_eq!(*lengths.get(labels[0]).expect("tracked"), 18);
        assert_eq!(*lengths.get(labels[1]).expect("tracked"), 3);
    }

    #[test]
    fn names_are_sequential_letters() {
        let values: Vec<i64> = (0..30).map(|_| 1).collect();
        let lengths = Lengths::new(values).expect("positive lengths");
        let labels = lengths.labels();
        assert_eq!(lengths.render(labels[0]).expect("tracked"), "a");
        assert_eq!(lengths.render(labels[25]).expect("tracked"), "z");
        assert_eq!(lengths.render(labels[26]).expect("tracked"), "aa");
        assert_eq!(lengths.render(labels[27]).expect("tracked"), "ab");
    }

    #[test]
    fn push_increases_or_tracks() {
        let mut lengths = lengths(&[5]);
        let a = lengths.labels()[0];
        lengths.push(a, 2).expect("positive increment");
        assert_eq!(*lengths.get(a).expect("tracked"), 7);

        let b = Label::fresh();
        lengths.push(b, 4).expect("positive length");
        assert_eq!(*lengths.get(b).expect("tracked"), 4);
        assert_eq!(lengths.render(b).expect("tracked"), "b");

        assert!(lengths.push(a, 0).is_err());
    }

    #[test]
    fn pop_forgets_the_label() {
        let mut lengths = lengths(&[5, 7]);
        let a = lengths.labels()[0];
        assert_eq!(lengths.pop(a).expect("tracked"), 5);
        assert!(lengths.get(a).is_err());
        assert_eq!(lengths.labels().len(), 1);
    }

    #[test]
    fn subtract_keeps_lengths_positive() {
        let mut lengths = lengths(&[5, 3]);
        let labels = lengths.labels();
        lengths.subtract(labels[0], labels[1]).expect("5 - 3 = 2");
        assert_eq!(*lengths.get(labels[0]).expect("tracked"), 2);
        assert!(lengths.subtract(labels[0], labels[1]).is_err());
        assert_eq!(*lengths.get(labels[0]).expect("unchanged"), 2);
    }

    #[test]
    fn subtract_repeated_is_a_euclidean_step() {
        let mut lengths = lengths(&[23, 5]);
        let labels = lengths.labels();
        let steps = lengths
            .subtract_repeated(labels[0], labels[1])
            .expect("23 = 4 * 5 + 3");
        assert_eq!(steps, BigUint::from(4u32));
        assert_eq!(*lengths.get(labels[0]).expect("tracked"), 3);
    }

    #[test]
    fn subtract_repeated_stops_short_of_zero() {
        let mut lengths = lengths(&[13, 1]);
        let labels = lengths.labels();
        let steps = lengths
            .subtract_repeated(labels[0], labels[1])
            .expect("exact multiple");
        assert_eq!(steps, BigUint::from(12u32));
        assert_eq!(*lengths.get(labels[0]).expect("tracked"), 1);
    }

    #[test]
    fn comparisons() {
        let lengths = lengths(&[5, 3, 5]);
        let labels = lengths.labels();
        assert_eq!(
            lengths.cmp(labels[0], labels[1]).expect("tracked"),
            Ordering::Greater
        );
        assert_eq!(
            lengths.cmp(labels[0], labels[2]).expect("tracked"),
            Ordering::Equal
        );
        assert!(lengths
            .similar(labels[0], labels[1], &2)
            .expect("tracked"));
        assert!(!lengths
            .similar(labels[0], labels[1], &1)
            .expect("tracked"));
    }

    #[test]
    fn ratios_are_compared_across_containers() {
        let saved = lengths(&[13, 5]);
        let current = lengths(&[26, 10]);
        let shrunk = lengths(&[3, 2]);
        let labels = saved.labels();

        assert!(saved
            .same_ratio(labels[0], labels[1], &current, labels[0], labels[1])
            .expect("tracked"));
        assert!(!saved
            .same_ratio(labels[0], labels[1], &shrunk, labels[0], labels[1])
            .expect("tracked"));
    }

    #[test]
    fn only_keeps_names_and_order() {
        let lengths = lengths(&[4, 56, 23]);
        let labels = lengths.labels();
        let restricted = lengths.only(&[labels[2], labels[0]]).expect("tracked");
        assert_eq!(restricted.labels(), vec![labels[0], labels[2]]);
        assert_eq!(restricted.render(labels[2]).expect("tracked"), "c");
        assert!(restricted.get(labels[1]).is_err());
    }

    #[test]
    fn forget_drops_labels() {
        let mut lengths = lengths(&[4, 56, 23]);
        let labels = lengths.labels();
        lengths.forget(&[labels[1]]).expect("tracked");
        assert_eq!(lengths.labels(), vec![labels[0], labels[2]]);
        assert!(lengths.forget(&[labels[1]]).is_err());
    }

    #[test]
    fn total_sums_everything() {
        assert_eq!(lengths(&[4, 56, 23]).total().expect("no overflow"), 83);
    }

    #[test]
    fn unknown_labels_are_reported() {
        let mut lengths = lengths(&[1]);
        let stranger = Label::from_id(99);
        assert_eq!(
            lengths.get(stranger),
            Err(Error::UnknownLabel(stranger))
        );
        assert!(lengths.pop(stranger).is_err());
        assert!(lengths.subtract(stranger, stranger).is_err());
    }
}
