//! Result artifacts: VTK exports for visualization and plain-text dumps.

use crate::{error::Error, mesh::TriangleMesh, Result};

use vtkio::{
  model::{
    Attribute, Attributes, ByteOrder, CellType, Cells, UnstructuredGridPiece, Version,
    VertexNumbers, Vtk,
  },
  IOBuffer,
};

use std::{fs::File, io::BufWriter, io::Write, path::Path};

/// Writes a nodal field over the mesh as an unstructured-grid `.vtu` file.
pub fn write_vtu(
  path: impl AsRef<Path>,
  mesh: &TriangleMesh,
  values: &na::DVector<f64>,
  name: &str,
) -> Result<()> {
  let points: Vec<f64> = mesh
    .vertices()
    .iter()
    .flat_map(|p| [p.x, p.y, 0.0])
    .collect();

  let connectivity: Vec<u64> = mesh
    .triangles()
    .iter()
    .flat_map(|tri| tri.vertices().map(|v| v as u64))
    .collect();
  let offsets: Vec<u64> = (1..=mesh.n_triangles() as u64).map(|i| 3 * i).collect();
  let cells = Cells {
    cell_verts: VertexNumbers::XML {
      connectivity,
      offsets,
    },
    types: vec![CellType::Triangle; mesh.n_triangles()],
  };

  let mut data = Attributes::new();
  data.point.push(
    Attribute::scalars(name, 1).with_data(values.iter().copied().collect::<Vec<f64>>()),
  );

  let grid = UnstructuredGridPiece {
    points: IOBuffer::F64(points),
    cells,
    data,
  };

  let vtk = Vtk {
    version: Version::new((4, 2)),
    title: String::from("acoufem result"),
    byte_order: ByteOrder::native(),
    data: grid.into(),
    file_path: None,
  };
  vtk
    .export(path.as_ref())
    .map_err(|err| Error::Vtk(Box::new(err)))
}

/// Writes a field as a count-prefixed plain-text dump in high-precision
/// scientific notation: `<count>\n<value_0>\n...\n<value_{count-1}>\n`.
pub fn write_solution_dat(path: impl AsRef<Path>, values: &na::DVector<f64>) -> Result<()> {
  let file = File::create(path)?;
  let mut writer = BufWriter::new(file);
  writeln!(writer, "{}", values.len())?;
  for v in values.iter() {
    writeln!(writer, "{v:.14e}")?;
  }
  writer.flush()?;
  Ok(())
}
