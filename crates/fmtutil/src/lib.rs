use std::fmt;

/// Wrapper around a slice whose `Display` renders the elements separated by
/// commas, optionally surrounded by brackets.
#[derive(Debug)]
pub struct DisplayableSlice<'a, T> {
    slice: &'a [T],
    brackets: bool,
}

impl<T: fmt::Display> fmt::Display for DisplayableSlice<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.brackets {
            write!(f, "[")?;
        }
        for (idx, item) in self.slice.iter().enumerate() {
            if idx > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{item}")?;
        }
        if self.brackets {
            write!(f, "]")?;
        }
        Ok(())
    }
}

pub trait IntoDisplayableSlice<T> {
    fn display_with_brackets(&self) -> DisplayableSlice<'_, T>;
    fn display_without_brackets(&self) -> DisplayableSlice<'_, T>;
}

impl<T: fmt::Display> IntoDisplayableSlice<T> for [T] {
    fn display_with_brackets(&self) -> DisplayableSlice<'_, T> {
        DisplayableSlice {
            slice: self,
            brackets: true,
        }
    }

    fn display_without_brackets(&self) -> DisplayableSlice<'_, T> {
        DisplayableSlice {
            slice: self,
            brackets: false,
        }
    }
}
