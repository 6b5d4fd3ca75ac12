use crate::object::Dict;
use crate::object::keys::{BITS_PER_COMPONENT, COLORS, COLUMNS, EARLY_CHANGE, PREDICTOR};
use crate::xref::XRef;
use log::warn;

pub(crate) struct PredictorParams {
    pub(crate) predictor: u8,
    pub(crate) colors: usize,
    pub(crate) bits_per_component: usize,
    pub(crate) columns: usize,
    pub(crate) early_change: bool,
}

impl Default for PredictorParams {
    fn default() -> Self {
        Self {
            predictor: 1,
            colors: 1,
            bits_per_component: 8,
            columns: 1,
            early_change: true,
        }
    }
}

impl PredictorParams {
    pub(crate) fn from_params(dict: Option<&Dict>, xref: &XRef) -> Self {
        let Some(dict) = dict else {
            return Self::default();
        };

        Self {
            predictor: dict.get(PREDICTOR, xref).unwrap_or(1),
            colors: dict.get::<usize>(COLORS, xref).unwrap_or(1).max(1),
            bits_per_component: dict.get(BITS_PER_COMPONENT, xref).unwrap_or(8),
            columns: dict.get::<usize>(COLUMNS, xref).unwrap_or(1).max(1),
            early_change: dict.get::<i32>(EARLY_CHANGE, xref).unwrap_or(1) != 0,
        }
    }

    fn bytes_per_pixel(&self) -> usize {
        (self.colors * self.bits_per_component).div_ceil(8)
    }

    fn row_length(&self) -> usize {
        (self.columns * self.colors * self.bits_per_component).div_ceil(8)
    }

    pub(crate) fn apply(&self, data: Vec<u8>) -> Option<Vec<u8>> {
        match self.predictor {
            0 | 1 => Some(data),
            2 => self.tiff(data),
            10..=15 => self.png(&data),
            p => {
                warn!("unknown predictor {p}");

                None
            }
        }
    }

    fn tiff(&self, mut data: Vec<u8>) -> Option<Vec<u8>> {
        if self.bits_per_component != 8 {
            warn!(
                "TIFF predictor with {} bits per component is not supported",
                self.bits_per_component
            );

            return Some(data);
        }

        let row_length = self.row_length();

        for row in data.chunks_mut(row_length) {
            for i in self.colors..row.len() {
                row[i] = row[i].wrapping_add(row[i - self.colors]);
            }
        }

        Some(data)
    }

    fn png(&self, data: &[u8]) -> Option<Vec<u8>> {
        let row_length = self.row_length();
        let bpp = self.bytes_per_pixel();
        let mut out = Vec::with_capacity(data.len());
        let mut prev = vec![0u8; row_length];

        for chunk in data.chunks(row_length + 1) {
            let (&kind, input) = chunk.split_first()?;
            let mut row = input.to_vec();
            // A truncated final row is padded, so that the arithmetic below stays simple.
            row.resize(row_length, 0);

            for i in 0..row_length {
                let left = if i >= bpp { row[i - bpp] } else { 0 };
                let up = prev[i];
                let up_left = if i >= bpp { prev[i - bpp] } else { 0 };

                let predicted = match kind {
                    0 => 0,
                    1 => left,
                    2 => up,
                    3 => ((left as u16 + up as u16) / 2) as u8,
                    4 => paeth(left, up, up_left),
                    k => {
                        warn!("unknown PNG filter type {k}");

                        return None;
                    }
                };

                row[i] = row[i].wrapping_add(predicted);
            }

            out.extend_from_slice(&row[..input.len().min(row_length)]);
            prev = row;
        }

        Some(out)
    }
}

fn paeth(a: u8, b: u8, c: u8) -> u8 {
    let p = a as i16 + b as i16 - c as i16;
    let pa = (p - a as i16).abs();
    let pb = (p - b as i16).abs();
    let pc = (p - c as i16).abs();

    if pa <= pb && pa <= pc {
        a
    } else if pb <= pc {
        b
    } else {
        c
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(predictor: u8, columns: usize) -> PredictorParams {
        PredictorParams {
            predictor,
            columns,
            ..PredictorParams::default()
        }
    }

    #[test]
    fn png_up() {
        let data = vec![2, 1, 2, 3, 2, 1, 1, 1];
        assert_eq!(params(12, 3).apply(data).unwrap(), vec![1, 2, 3, 2, 3, 4]);
    }

    #[test]
    fn png_sub_and_paeth() {
        let data = vec![1, 5, 1, 1, 4, 0, 0, 0];
        assert_eq!(params(15, 3).apply(data).unwrap(), vec![5, 6, 7, 5, 6, 7]);
    }

    #[test]
    fn tiff() {
        let data = vec![1, 1, 1, 10, 0, 5];
        assert_eq!(params(2, 3).apply(data).unwrap(), vec![1, 2, 3, 10, 10, 15]);
    }
}
