use crate::grid::CartesianGrid;
use crate::StrError;
use std::fmt::Write;
use std::fs::{self, File};
use std::io::Write as IoWrite;
use std::path::Path;

/// Defines the VTK cell type of hexahedra
const VTK_HEXAHEDRON: usize = 12;

/// Holds a field with one scalar or vector value per cell
pub struct CellField {
    /// Name of the field
    pub name: String,

    /// Number of components (1 for scalars, 3 for vectors)
    pub ncomp: usize,

    /// Values (flattened; ncell × ncomp)
    pub values: Vec<f64>,
}

impl CellField {
    /// Allocates a scalar field
    pub fn scalar(name: &str, values: &[f64]) -> Self {
        CellField {
            name: name.to_string(),
            ncomp: 1,
            values: values.to_vec(),
        }
    }

    /// Allocates a vector field
    pub fn vector(name: &str, values: &[[f64; 3]]) -> Self {
        CellField {
            name: name.to_string(),
            ncomp: 3,
            values: values.iter().flatten().copied().collect(),
        }
    }
}

/// Receives the diagnostic cell fields of a simulation step
pub trait DiagnosticSink {
    /// Writes (or records) the fields identified by `name`
    fn write_step(&mut self, grid: &CartesianGrid, name: &str, fields: &[CellField]) -> Result<(), StrError>;
}

/// Writes diagnostic fields to ASCII VTU files (ParaView)
pub struct VtuWriter {
    out_dir: String,
}

impl VtuWriter {
    /// Allocates a new instance
    pub fn new(out_dir: &str) -> Self {
        VtuWriter {
            out_dir: out_dir.to_string(),
        }
    }

    /// Returns the path of the VTU file associated with `name`
    pub fn path_vtu(&self, name: &str) -> String {
        format!("{}/{}.vtu", self.out_dir, name)
    }
}

impl DiagnosticSink for VtuWriter {
    fn write_step(&mut self, grid: &CartesianGrid, name: &str, fields: &[CellField]) -> Result<(), StrError> {
        let ncell = grid.ncell();
        let coords = grid.point_coords();
        let npoint = coords.len();
        for field in fields {
            if field.values.len() != ncell * field.ncomp {
                return Err("cell fields must have ncomp values per cell");
            }
        }

        // output buffer
        let mut buffer = String::new();

        // header
        write!(
            &mut buffer,
            "<?xml version=\"1.0\"?>\n\
             <VTKFile type=\"UnstructuredGrid\" version=\"0.1\" byte_order=\"LittleEndian\">\n\
             <UnstructuredGrid>\n\
             <Piece NumberOfPoints=\"{}\" NumberOfCells=\"{}\">\n",
            npoint, ncell
        )
        .unwrap();

        // points
        write!(
            &mut buffer,
            "<Points>\n\
             <DataArray type=\"Float64\" NumberOfComponents=\"3\" format=\"ascii\">\n",
        )
        .unwrap();
        for x in &coords {
            write!(&mut buffer, "{:?} {:?} {:?} ", x[0], x[1], x[2]).unwrap();
        }
        write!(
            &mut buffer,
            "\n</DataArray>\n\
             </Points>\n"
        )
        .unwrap();

        // cells: connectivity
        write!(
            &mut buffer,
            "<Cells>\n\
             <DataArray type=\"Int32\" Name=\"connectivity\" format=\"ascii\">\n"
        )
        .unwrap();
        for c in 0..ncell {
            for p in &grid.cell_points(c) {
                write!(&mut buffer, "{} ", p).unwrap();
            }
        }

        // cells: offsets
        write!(
            &mut buffer,
            "\n</DataArray>\n\
             <DataArray type=\"Int32\" Name=\"offsets\" format=\"ascii\">\n"
        )
        .unwrap();
        for c in 0..ncell {
            write!(&mut buffer, "{} ", 8 * (c + 1)).unwrap();
        }

        // cells: types
        write!(
            &mut buffer,
            "\n</DataArray>\n\
             <DataArray type=\"UInt8\" Name=\"types\" format=\"ascii\">\n"
        )
        .unwrap();
        for _ in 0..ncell {
            write!(&mut buffer, "{} ", VTK_HEXAHEDRON).unwrap();
        }
        write!(
            &mut buffer,
            "\n</DataArray>\n\
             </Cells>\n"
        )
        .unwrap();

        // data: cells
        write!(&mut buffer, "<CellData Scalars=\"TheScalars\">\n").unwrap();
        for field in fields {
            write!(
                &mut buffer,
                "<DataArray type=\"Float64\" Name=\"{}\" NumberOfComponents=\"{}\" format=\"ascii\">\n",
                field.name, field.ncomp
            )
            .unwrap();
            for value in &field.values {
                write!(&mut buffer, "{:?} ", value).unwrap();
            }
            write!(&mut buffer, "\n</DataArray>\n").unwrap();
        }
        write!(&mut buffer, "</CellData>\n").unwrap();

        // footer
        write!(
            &mut buffer,
            "</Piece>\n\
             </UnstructuredGrid>\n\
             </VTKFile>\n"
        )
        .unwrap();

        // create directory
        let path = self.path_vtu(name);
        if let Some(p) = Path::new(&path).parent() {
            fs::create_dir_all(p).map_err(|_| "cannot create directory")?;
        }

        // write file
        let mut file = File::create(&path).map_err(|_| "cannot create VTU file")?;
        file.write_all(buffer.as_bytes()).map_err(|_| "cannot write VTU file")?;
        file.sync_all().map_err(|_| "cannot sync VTU file")?;
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
