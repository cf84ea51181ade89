//! Matrix linearization and subset extraction.

use std::fmt;
use std::str::FromStr;

use crate::bits::BitSequence;
use crate::error::PrepError;
use crate::matrix::SourceMatrix;
use crate::transcript::Transcript;

/// Default number of elements taken when a subset is requested without a size.
pub const DEFAULT_SUBSET_SIZE: i64 = 10_000;

/// Linearization rule for a two-dimensional source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TraversalOrder {
    /// Row by row, left to right, top to bottom.
    #[default]
    RowMajor,
    /// Column by column, top to bottom, left to right.
    ColumnMajor,
}

impl TraversalOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RowMajor => "row-major",
            Self::ColumnMajor => "column-major",
        }
    }
}

impl fmt::Display for TraversalOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TraversalOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "row-major" | "row" | "C" => Ok(Self::RowMajor),
            "column-major" | "col-major" | "column" | "F" => Ok(Self::ColumnMajor),
            _ => Err(format!(
                "unknown traversal order '{s}' (expected row-major or column-major)"
            )),
        }
    }
}

/// Optional restriction of the working matrix to its first `size` elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubsetSpec {
    pub enabled: bool,
    pub size: i64,
}

impl SubsetSpec {
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            size: DEFAULT_SUBSET_SIZE,
        }
    }

    pub fn of(size: i64) -> Self {
        Self {
            enabled: true,
            size,
        }
    }
}

impl Default for SubsetSpec {
    fn default() -> Self {
        Self::disabled()
    }
}

/// Output of [`extract`]: the bit sequence plus the shape it was read from.
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub bits: BitSequence,
    /// Shape of the working matrix that was traversed.
    pub shape: (usize, usize),
    /// Set when the requested subset was larger than the source and got clamped.
    pub clamped: bool,
}

/// Truncate toward zero. Entries are not checked for binarity: `-1.5`
/// becomes `-1` and `256.0` stays `256`. NaN becomes 0.
fn truncate(v: f64) -> i64 {
    v.trunc() as i64
}

/// Linearize `matrix` in the requested order.
pub fn traverse(matrix: &SourceMatrix, order: TraversalOrder) -> BitSequence {
    let bits = match order {
        TraversalOrder::RowMajor => matrix.as_slice().iter().map(|&v| truncate(v)).collect(),
        TraversalOrder::ColumnMajor => {
            let mut out = Vec::with_capacity(matrix.len());
            for c in 0..matrix.cols() {
                for r in 0..matrix.rows() {
                    out.push(truncate(matrix.get(r, c)));
                }
            }
            out
        }
    };
    BitSequence::new(bits)
}

/// Take the first `size` elements of `matrix` in storage order and reshape
/// them to `√size × √size` when `size` is a perfect square, else `1 × size`.
///
/// A `size` larger than the matrix is clamped to the element count with a
/// warning; `size <= 0` is an error.
pub fn take_subset(
    matrix: &SourceMatrix,
    size: i64,
    transcript: &mut Transcript,
) -> Result<(SourceMatrix, bool), PrepError> {
    if size <= 0 {
        return Err(PrepError::InvalidSubsetSize(size));
    }
    let total = matrix.len();
    let mut size = usize::try_from(size).unwrap_or(usize::MAX);
    let clamped = size > total;
    if clamped {
        transcript.warn(format!(
            "Requested subset size ({size}) larger than array size ({total}). Using full array."
        ));
        size = total;
    }
    transcript.line(format!("Extracting subset of {size} elements"));

    let head = matrix.as_slice()[..size].to_vec();
    let side = integer_sqrt(size);
    let reshaped = if side * side == size {
        transcript.line(format!("Reshaped to {side}x{side} matrix"));
        SourceMatrix::from_raw_parts(side, side, head)
    } else {
        transcript.line(format!("Using 1D array of length {size}"));
        SourceMatrix::row_vector(head)
    };
    Ok((reshaped, clamped))
}

/// Apply the optional subset, then traverse the working matrix.
pub fn extract(
    matrix: &SourceMatrix,
    order: TraversalOrder,
    subset: SubsetSpec,
    transcript: &mut Transcript,
) -> Result<Extraction, PrepError> {
    let (working, clamped) = if subset.enabled {
        take_subset(matrix, subset.size, transcript)?
    } else {
        (matrix.clone(), false)
    };

    transcript.line(format!("Using traversal order: {order}"));
    let bits = traverse(&working, order);
    let non_binary = bits.non_binary();
    if non_binary > 0 {
        transcript.warn(format!(
            "{non_binary} of {} elements are not 0 or 1; they are written unchanged",
            bits.len()
        ));
    }
    Ok(Extraction {
        bits,
        shape: working.shape(),
        clamped,
    })
}

fn integer_sqrt(n: usize) -> usize {
    let mut r = (n as f64).sqrt() as usize;
    while r * r > n {
        r -= 1;
    }
    while (r + 1) * (r + 1) <= n {
        r += 1;
    }
    r
}
