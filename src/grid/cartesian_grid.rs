use crate::base::NDIM;
use crate::StrError;

/// Defines the number of faces of a hexahedral cell
pub const N_CELL_FACE: usize = 6;

/// Holds a hexahedral cell of the block
#[derive(Clone, Debug)]
pub struct GridCell {
    /// Index of the cell
    pub index: usize,

    /// Volume of the cell
    pub volume: f64,

    /// Centroid of the cell
    pub centroid: [f64; NDIM],

    /// Global face indices ordered as `-x, +x, -y, +y, -z, +z`
    pub faces: [usize; N_CELL_FACE],
}

/// Holds a face of the block
///
/// The face normal always points along the positive direction of `axis`.
#[derive(Clone, Debug)]
pub struct GridFace {
    /// Index of the face
    pub index: usize,

    /// Axis normal to the face
    pub axis: usize,

    /// Area of the face
    pub area: f64,

    /// Centroid of the face
    pub centroid: [f64; NDIM],

    /// Cell on the negative side of the face (None on the min boundary)
    pub cell_minus: Option<usize>,

    /// Cell on the positive side of the face (None on the max boundary)
    pub cell_plus: Option<usize>,

    /// Boundary id if this is a boundary face
    pub boundary_id: Option<usize>,
}

/// Holds a boundary face of the block
#[derive(Clone, Copy, Debug)]
pub struct BoundaryFace {
    /// Global face index
    pub face: usize,

    /// The only cell sharing the face
    pub cell: usize,

    /// Side of the block: 0 = -x, 1 = +x, 2 = -y, 3 = +y, 4 = -z, 5 = +z
    pub side: usize,
}

/// Implements a structured block of `nx × ny × nz` hexahedral cells
///
/// Cells are numbered with x running fastest, i.e., `c = i + nx (j + ny k)`.
pub struct CartesianGrid {
    /// Number of cells along each axis
    pub ndiv: [usize; NDIM],

    /// Cell size along each axis
    pub cell_size: [f64; NDIM],

    /// All cells
    pub cells: Vec<GridCell>,

    /// All faces (interior and boundary)
    pub faces: Vec<GridFace>,

    /// Boundary faces indexed by boundary id
    pub boundary: Vec<BoundaryFace>,
}

impl CartesianGrid {
    /// Allocates a new instance
    pub fn new(ndiv: [usize; NDIM], cell_size: [f64; NDIM]) -> Result<Self, StrError> {
        if ndiv.iter().any(|n| *n < 1) {
            return Err("the number of cells along each axis must be ≥ 1");
        }
        if cell_size.iter().any(|h| *h <= 0.0) {
            return Err("the cell sizes must be > 0.0");
        }
        let [nx, ny, nz] = ndiv;
        let volume = cell_size[0] * cell_size[1] * cell_size[2];

        // cells
        let mut cells = Vec::with_capacity(nx * ny * nz);
        for k in 0..nz {
            for j in 0..ny {
                for i in 0..nx {
                    let ijk = [i, j, k];
                    let mut centroid = [0.0; NDIM];
                    for d in 0..NDIM {
                        centroid[d] = (ijk[d] as f64 + 0.5) * cell_size[d];
                    }
                    cells.push(GridCell {
                        index: cells.len(),
                        volume,
                        centroid,
                        faces: [usize::MAX; N_CELL_FACE],
                    });
                }
            }
        }

        // faces
        let cell_index = |ijk: [usize; NDIM]| ijk[0] + nx * (ijk[1] + ny * ijk[2]);
        let mut faces = Vec::new();
        let mut boundary = Vec::new();
        for axis in 0..NDIM {
            let mut dims = ndiv;
            dims[axis] += 1;
            let area: f64 = (0..NDIM).filter(|d| *d != axis).map(|d| cell_size[d]).product();
            for k in 0..dims[2] {
                for j in 0..dims[1] {
                    for i in 0..dims[0] {
                        let ijk = [i, j, k];
                        let pos = ijk[axis];
                        let index = faces.len();
                        let cell_minus = if pos > 0 {
                            let mut m = ijk;
                            m[axis] -= 1;
                            Some(cell_index(m))
                        } else {
                            None
                        };
                        let cell_plus = if pos < ndiv[axis] { Some(cell_index(ijk)) } else { None };
                        let mut centroid = [0.0; NDIM];
                        for d in 0..NDIM {
                            centroid[d] = if d == axis {
                                pos as f64 * cell_size[d]
                            } else {
                                (ijk[d] as f64 + 0.5) * cell_size[d]
                            };
                        }
                        if let Some(c) = cell_minus {
                            cells[c].faces[2 * axis + 1] = index;
                        }
                        if let Some(c) = cell_plus {
                            cells[c].faces[2 * axis] = index;
                        }
                        let boundary_id = match (cell_minus, cell_plus) {
                            (None, Some(c)) => {
                                boundary.push(BoundaryFace {
                                    face: index,
                                    cell: c,
                                    side: 2 * axis,
                                });
                                Some(boundary.len() - 1)
                            }
                            (Some(c), None) => {
                                boundary.push(BoundaryFace {
                                    face: index,
                                    cell: c,
                                    side: 2 * axis + 1,
                                });
                                Some(boundary.len() - 1)
                            }
                            _ => None,
                        };
                        faces.push(GridFace {
                            index,
                            axis,
                            area,
                            centroid,
                            cell_minus,
                            cell_plus,
                            boundary_id,
                        });
                    }
                }
            }
        }
        Ok(CartesianGrid {
            ndiv,
            cell_size,
            cells,
            faces,
            boundary,
        })
    }

    /// Returns the number of cells
    #[inline]
    pub fn ncell(&self) -> usize {
        self.cells.len()
    }

    /// Returns the number of faces
    #[inline]
    pub fn nface(&self) -> usize {
        self.faces.len()
    }

    /// Returns the number of boundary faces
    #[inline]
    pub fn n_boundary_face(&self) -> usize {
        self.boundary.len()
    }

    /// Returns the global face indices of a cell
    #[inline]
    pub fn cell_faces(&self, cell: usize) -> &[usize; N_CELL_FACE] {
        &self.cells[cell].faces
    }

    /// Returns a boundary face given its boundary id
    #[inline]
    pub fn boundary_face(&self, bid: usize) -> &BoundaryFace {
        &self.boundary[bid]
    }

    /// Indicates whether a face is on the boundary
    #[inline]
    pub fn is_boundary(&self, face: usize) -> bool {
        self.faces[face].boundary_id.is_some()
    }

    /// Returns +1 if the face normal points out of the cell, or -1 otherwise
    #[inline]
    pub fn outward_sign(&self, cell: usize, face: usize) -> f64 {
        if self.faces[face].cell_minus == Some(cell) {
            1.0
        } else {
            -1.0
        }
    }

    /// Returns the cell on the other side of an interior face
    pub fn neighbor(&self, cell: usize, face: usize) -> Option<usize> {
        let f = &self.faces[face];
        if f.cell_minus == Some(cell) {
            f.cell_plus
        } else {
            f.cell_minus
        }
    }

    /// Returns the length of the block along an axis
    #[inline]
    pub fn length(&self, axis: usize) -> f64 {
        self.ndiv[axis] as f64 * self.cell_size[axis]
    }

    /// Returns the bulk volume of the block
    pub fn total_volume(&self) -> f64 {
        self.cells.iter().map(|c| c.volume).sum()
    }

    /// Finds the boundary face geometrically matching `bid` on the opposite side of the block
    ///
    /// The partner lies on the other side of the same axis and has the same centroid
    /// coordinates along the two transverse axes. Returns None if no face matches.
    pub fn periodic_partner(&self, bid: usize) -> Option<usize> {
        let bf = self.boundary.get(bid)?;
        let opposite = bf.side ^ 1;
        let axis = bf.side / 2;
        let centroid = &self.faces[bf.face].centroid;
        let h_min = self.cell_size.iter().fold(f64::MAX, |acc, h| f64::min(acc, *h));
        let tol = 1e-6 * h_min;
        self.boundary.iter().position(|other| {
            other.side == opposite
                && (0..NDIM)
                    .filter(|d| *d != axis)
                    .all(|d| f64::abs(self.faces[other.face].centroid[d] - centroid[d]) < tol)
        })
    }

    /// Returns the coordinates of the grid points (for visualization)
    ///
    /// Points are numbered with x running fastest over `(nx+1) × (ny+1) × (nz+1)` nodes.
    pub fn point_coords(&self) -> Vec<[f64; NDIM]> {
        let [nx, ny, nz] = self.ndiv;
        let mut coords = Vec::with_capacity((nx + 1) * (ny + 1) * (nz + 1));
        for k in 0..(nz + 1) {
            for j in 0..(ny + 1) {
                for i in 0..(nx + 1) {
                    coords.push([
                        i as f64 * self.cell_size[0],
                        j as f64 * self.cell_size[1],
                        k as f64 * self.cell_size[2],
                    ]);
                }
            }
        }
        coords
    }

    /// Returns the point ids of a cell in the VTK hexahedron order
    pub fn cell_points(&self, cell: usize) -> [usize; 8] {
        let [nx, ny, _] = self.ndiv;
        let i = cell % nx;
        let j = (cell / nx) % ny;
        let k = cell / (nx * ny);
        let p = |i: usize, j: usize, k: usize| i + (nx + 1) * (j + (ny + 1) * k);
        [
            p(i, j, k),
            p(i + 1, j, k),
            p(i + 1, j + 1, k),
            p(i, j + 1, k),
            p(i, j, k + 1),
            p(i + 1, j, k + 1),
            p(i + 1, j + 1, k + 1),
            p(i, j + 1, k + 1),
        ]
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
