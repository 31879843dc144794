//! Synthetic pixel-edge insertion.
//!
//! Rotation moves the seam of the map onto specific source longitudes and
//! latitudes. Inserting an explicit edge there (and duplicating the pixel
//! it cuts through) lets the splitter cut exactly along a pixel boundary.

use crate::grid::Matrix;
use crate::util::{SkyMapError, SkyMapResult};

/// Which grid axis a coordinate array belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    /// Longitude edges; data columns are duplicated.
    Lon,
    /// Latitude edges; data rows are duplicated.
    Lat,
}

/// Inserts `new_value` into the ascending edge array `coords`.
///
/// Returns the new edges and, when `data` holds pixels, a data matrix in
/// which the row ([`Axis::Lat`]) or column ([`Axis::Lon`]) straddling
/// `new_value` appears twice, once on each side of the new edge.
///
/// * A value outside `[min(coords), max(coords)]` is a no-op.
/// * A value equal to an existing edge replaces that edge, leaving the
///   lengths unchanged.
/// * Without data (or with an empty matrix) only the edges change.
pub fn insert_coordinate(
    new_value: f64,
    coords: &[f64],
    axis: Axis,
    data: Option<&Matrix>,
) -> SkyMapResult<(Vec<f64>, Option<Matrix>)> {
    SkyMapError::check_finite("inserted coordinate", new_value)?;
    let data = data.filter(|m| m.rows() > 0);

    let all_above = coords.iter().all(|&c| c > new_value);
    let all_below = coords.iter().all(|&c| c < new_value);
    if all_above || all_below {
        return Ok((coords.to_vec(), data.cloned()));
    }

    let below: Vec<usize> = (0..coords.len()).filter(|&i| coords[i] < new_value).collect();
    let above: Vec<usize> = (0..coords.len()).filter(|&i| coords[i] > new_value).collect();

    let mut out = Vec::with_capacity(below.len() + above.len() + 1);
    out.extend(below.iter().map(|&i| coords[i]));
    out.push(new_value);
    out.extend(above.iter().map(|&i| coords[i]));

    let data = match data {
        None => None,
        Some(matrix) => {
            // Pixel i spans edges i and i + 1, so pixels below keep their
            // index and pixels above shift down by one.
            let source = below
                .iter()
                .map(|&i| Ok(i))
                .chain(above.iter().map(|&i| {
                    i.checked_sub(1)
                        .ok_or(SkyMapError::InvalidInput("coordinates must be ascending"))
                }))
                .collect::<SkyMapResult<Vec<usize>>>()?;
            let picked = match axis {
                Axis::Lon => matrix.pick_columns(&source)?,
                Axis::Lat => matrix.pick_rows(&source)?,
            };
            Some(picked)
        }
    };

    Ok((out, data))
}

#[cfg(test)]
mod tests {
    use super::{insert_coordinate, Axis};
    use crate::grid::Matrix;

    fn data() -> Matrix {
        Matrix::from_rows(vec![vec![1.0, 2.0, 3.0, 4.0], vec![5.0, 6.0, 7.0, 8.0]]).unwrap()
    }

    const LONS: [f64; 5] = [0.0, 90.0, 180.0, 270.0, 360.0];

    #[test]
    fn longitude_insert_duplicates_straddling_column() {
        let (lons, out) = insert_coordinate(45.0, &LONS, Axis::Lon, Some(&data())).unwrap();
        assert_eq!(lons, vec![0.0, 45.0, 90.0, 180.0, 270.0, 360.0]);
        let out = out.unwrap();
        assert_eq!(out.shape(), (2, 5));
        assert_eq!(out.row(0).unwrap(), &[1.0, 1.0, 2.0, 3.0, 4.0]);
        assert_eq!(out.row(1).unwrap(), &[5.0, 5.0, 6.0, 7.0, 8.0]);
    }

    #[test]
    fn latitude_insert_duplicates_straddling_row() {
        let (lats, out) =
            insert_coordinate(55.0, &[-90.0, 0.0, 90.0], Axis::Lat, Some(&data())).unwrap();
        assert_eq!(lats, vec![-90.0, 0.0, 55.0, 90.0]);
        let out = out.unwrap();
        assert_eq!(out.shape(), (3, 4));
        assert_eq!(out.row(1).unwrap(), &[5.0, 6.0, 7.0, 8.0]);
        assert_eq!(out.row(2).unwrap(), &[5.0, 6.0, 7.0, 8.0]);
    }

    #[test]
    fn out_of_range_is_noop() {
        let (lons, out) = insert_coordinate(400.0, &LONS, Axis::Lon, Some(&data())).unwrap();
        assert_eq!(lons, LONS.to_vec());
        assert_eq!(out.unwrap(), data());
        let (lons, _) = insert_coordinate(-1.0, &LONS, Axis::Lon, None).unwrap();
        assert_eq!(lons, LONS.to_vec());
    }

    #[test]
    fn existing_edge_keeps_lengths() {
        let (lons, out) = insert_coordinate(180.0, &LONS, Axis::Lon, Some(&data())).unwrap();
        assert_eq!(lons, LONS.to_vec());
        assert_eq!(out.unwrap(), data());
        let (lons, _) = insert_coordinate(0.0, &LONS, Axis::Lon, None).unwrap();
        assert_eq!(lons, LONS.to_vec());
    }

    #[test]
    fn without_data_only_coordinates_change() {
        let (lons, out) = insert_coordinate(100.0, &LONS, Axis::Lon, None).unwrap();
        assert_eq!(lons.len(), 6);
        assert!(out.is_none());
        let (_, out) = insert_coordinate(100.0, &LONS, Axis::Lon, Some(&Matrix::default())).unwrap();
        assert!(out.is_none());
    }

    #[test]
    fn rejects_nan_value() {
        assert!(insert_coordinate(f64::NAN, &LONS, Axis::Lon, None).is_err());
    }
}
