//! Reader for Gmsh `.msh` files, format version 2.2.
//!
//! The file is tokenized as a whole and sections are handled through a
//! keyword dispatch table: read a token, look up a section handler, let it
//! consume the section, repeat until end of input. Unknown sections (for
//! example `$PhysicalNames`) are skipped token by token.
//!
//! ASCII and binary node payloads are supported; binary element payloads
//! are an explicit unsupported-format failure.

use crate::{
  error::{Error, MeshFormatError},
  geometry::{BoundaryLine, Point, Triangle},
  mesh::TriangleMesh,
  VertexIdx,
};

use std::{borrow::Cow, collections::HashMap, path::Path, str::FromStr};

/// The one format version this reader understands.
const SUPPORTED_VERSION: f64 = 2.2;

/// Reads and parses a mesh file. Fails fast: any violated expectation
/// aborts the read and no partial mesh reaches the caller.
pub fn read_msh(path: impl AsRef<Path>) -> crate::Result<TriangleMesh> {
  let path = path.as_ref();
  let bytes = std::fs::read(path).map_err(|source| Error::MeshIo {
    path: path.to_path_buf(),
    source,
  })?;
  parse_msh_bytes(&bytes).map_err(|source| Error::MeshFormat {
    path: path.to_path_buf(),
    source,
  })
}

/// Parses an in-memory `.msh` payload.
pub fn parse_msh_bytes(bytes: &[u8]) -> Result<TriangleMesh, MeshFormatError> {
  let mut lexer = Lexer::new(bytes);

  let header = lexer.next_token("format header")?;
  if header != "$MeshFormat" {
    return Err(MeshFormatError::BadHeader {
      found: header.into_owned(),
    });
  }

  let version: f64 = lexer.parse_num("format version")?;
  if version != SUPPORTED_VERSION {
    return Err(MeshFormatError::UnsupportedVersion { version });
  }

  let binary_flag: i32 = lexer.parse_num("binary flag")?;
  let declared: usize = lexer.parse_num("floating-point size")?;
  let host = std::mem::size_of::<f64>();
  if declared != host {
    return Err(MeshFormatError::FloatSizeMismatch { declared, host });
  }

  let binary = binary_flag != 0;
  if binary {
    // Binary files carry the integer one right after the format line.
    // Reading anything else means the byte order of the file is foreign.
    lexer.skip_line();
    let raw = lexer.read_bytes(4, "binary sentinel")?;
    let found = i32::from_ne_bytes(raw.try_into().expect("4 bytes requested"));
    if found != 1 {
      return Err(MeshFormatError::BadBinarySentinel { found });
    }
  }

  let mut builder = MeshBuilder::new(binary);
  while let Some(token) = lexer.try_next_token() {
    if let Some((_, handler)) = SECTIONS.iter().find(|(keyword, _)| token == *keyword) {
      handler(&mut lexer, &mut builder)?;
    }
  }
  builder.finish()
}

type SectionHandler = for<'a> fn(&mut Lexer<'a>, &mut MeshBuilder) -> Result<(), MeshFormatError>;

const SECTIONS: &[(&str, SectionHandler)] = &[("$Nodes", read_nodes), ("$Elements", read_elements)];

/// The `$Nodes` section: node count, then one id plus three coordinates per
/// node. Node ids in the file may be sparse and in any order; they are
/// remapped to contiguous 0-based indices in insertion order.
fn read_nodes(lexer: &mut Lexer, builder: &mut MeshBuilder) -> Result<(), MeshFormatError> {
  let n_nodes: usize = lexer.parse_num("node count")?;

  if builder.binary {
    lexer.skip_line();
    for _ in 0..n_nodes {
      let raw = lexer.read_bytes(4, "binary node id")?;
      let id = u32::from_ne_bytes(raw.try_into().expect("4 bytes requested")) as usize;
      let mut coords = [0.0; 3];
      for coord in &mut coords {
        let raw = lexer.read_bytes(8, "binary node coordinate")?;
        *coord = f64::from_ne_bytes(raw.try_into().expect("8 bytes requested"));
      }
      builder.push_vertex(id, Point::new(coords[0], coords[1]));
    }
  } else {
    for _ in 0..n_nodes {
      let id: usize = lexer.parse_num("node id")?;
      let x: f64 = lexer.parse_num("node coordinate")?;
      let y: f64 = lexer.parse_num("node coordinate")?;
      let _z: f64 = lexer.parse_num("node coordinate")?;
      builder.push_vertex(id, Point::new(x, y));
    }
  }

  // A repeated id overwrites its map slot, so a shrunken map means the
  // declared count was reached through duplicates.
  let distinct = builder.node_ids.len();
  if distinct != n_nodes {
    return Err(MeshFormatError::DuplicateNodeIds {
      declared: n_nodes,
      distinct,
    });
  }
  Ok(())
}

/// The `$Elements` section: element count, then per element an id, a type
/// code, a tag count, the tags and a type-determined number of node
/// references.
///
/// Tag order is: physical domain, elementary domain, partition count,
/// owning partition, ghost partitions (negated in the file). Missing
/// phys/elementary tags default to 0; missing partition info stays empty.
fn read_elements(lexer: &mut Lexer, builder: &mut MeshBuilder) -> Result<(), MeshFormatError> {
  let n_elements: usize = lexer.parse_num("element count")?;

  if builder.binary {
    return Err(MeshFormatError::BinaryElements);
  }

  let mut last_id = 0;
  for _ in 0..n_elements {
    let id: usize = lexer.parse_num("element id")?;
    let el_type: u32 = lexer.parse_num("element type")?;
    let n_tags: usize = lexer.parse_num("element tag count")?;
    let tags = (0..n_tags)
      .map(|_| lexer.parse_num("element tag"))
      .collect::<Result<Vec<i64>, _>>()?;

    let phys_domain = tags.first().copied().unwrap_or(0) as i32;
    let _elem_domain = tags.get(1).copied().unwrap_or(0) as i32;
    let (partition, ghost_partitions) = if n_tags > 2 {
      let n_partitions = tags[2];
      if n_partitions < 1 {
        return Err(MeshFormatError::BadPartitionCount {
          id,
          count: n_partitions,
        });
      }
      let partition = tags.get(3).copied().unwrap_or(0) as i32;
      // Ghost partitions carry a negative sign in the file.
      let ghosts = tags
        .get(4..)
        .unwrap_or(&[])
        .iter()
        .take(n_partitions as usize - 1)
        .map(|&g| g.abs() as i32)
        .collect();
      (partition, ghosts)
    } else {
      (0, Vec::new())
    };

    let n_elem_nodes = match el_type {
      1 => 2, // 2-node line
      2 => 3, // 3-node triangle
      code => return Err(MeshFormatError::UnknownElementType { code }),
    };
    let mut nodes: [VertexIdx; 3] = [0; 3];
    for node in nodes.iter_mut().take(n_elem_nodes) {
      let file_id: usize = lexer.parse_num("element node reference")?;
      *node = builder.resolve(file_id);
    }

    match el_type {
      1 => builder
        .boundary_lines
        .push(BoundaryLine::new([nodes[0], nodes[1]], phys_domain)),
      2 => builder.triangles.push(Triangle::new(
        [nodes[0], nodes[1], nodes[2]],
        phys_domain,
        partition,
        ghost_partitions,
      )),
      _ => unreachable!("type code checked above"),
    }

    last_id = id;
  }

  // A truncated or corrupt file shows up as an id/count mismatch.
  if last_id != n_elements {
    return Err(MeshFormatError::TruncatedElements {
      last: last_id,
      declared: n_elements,
    });
  }
  if builder.triangles.is_empty() {
    return Err(MeshFormatError::NoTriangles);
  }
  Ok(())
}

/// Accumulates mesh entities while sections are parsed. Only [`finish`]
/// hands a mesh to the caller, so a failed section never leaks state.
struct MeshBuilder {
  binary: bool,
  vertices: Vec<Point>,
  /// File-native node id to 0-based insertion index.
  node_ids: HashMap<usize, VertexIdx>,
  triangles: Vec<Triangle>,
  boundary_lines: Vec<BoundaryLine>,
  bounding_box: Option<(Point, Point)>,
}

impl MeshBuilder {
  fn new(binary: bool) -> Self {
    Self {
      binary,
      vertices: Vec::new(),
      node_ids: HashMap::new(),
      triangles: Vec::new(),
      boundary_lines: Vec::new(),
      bounding_box: None,
    }
  }

  fn push_vertex(&mut self, file_id: usize, point: Point) {
    self.bounding_box = match self.bounding_box {
      None => Some((point, point)),
      Some((min, max)) => Some((min.inf(&point), max.sup(&point))),
    };
    self.node_ids.insert(file_id, self.vertices.len());
    self.vertices.push(point);
  }

  /// A dangling node reference cannot happen in a file whose node section
  /// parsed cleanly, hence a programming-invariant panic instead of a
  /// format error.
  fn resolve(&self, file_id: usize) -> VertexIdx {
    *self
      .node_ids
      .get(&file_id)
      .unwrap_or_else(|| panic!("mesh element references unknown node id {file_id}"))
  }

  fn finish(self) -> Result<TriangleMesh, MeshFormatError> {
    // A mesh made of boundary lines alone is useless for the 2D solve.
    if self.triangles.is_empty() {
      return Err(MeshFormatError::NoTriangles);
    }
    let (min_coord, max_coord) = self.bounding_box.expect("triangles imply vertices");
    Ok(TriangleMesh::new(
      self.vertices,
      self.triangles,
      self.boundary_lines,
      min_coord,
      max_coord,
    ))
  }
}

/// Whitespace-token lexer over the raw file bytes, with byte-exact reads
/// for the binary payloads.
struct Lexer<'a> {
  bytes: &'a [u8],
  pos: usize,
}

impl<'a> Lexer<'a> {
  fn new(bytes: &'a [u8]) -> Self {
    Self { bytes, pos: 0 }
  }

  fn try_next_token(&mut self) -> Option<Cow<'a, str>> {
    while self.pos < self.bytes.len() && self.bytes[self.pos].is_ascii_whitespace() {
      self.pos += 1;
    }
    if self.pos >= self.bytes.len() {
      return None;
    }
    let start = self.pos;
    while self.pos < self.bytes.len() && !self.bytes[self.pos].is_ascii_whitespace() {
      self.pos += 1;
    }
    Some(String::from_utf8_lossy(&self.bytes[start..self.pos]))
  }

  fn next_token(&mut self, what: &'static str) -> Result<Cow<'a, str>, MeshFormatError> {
    self
      .try_next_token()
      .ok_or(MeshFormatError::UnexpectedEof(what))
  }

  fn parse_num<T: FromStr>(&mut self, what: &'static str) -> Result<T, MeshFormatError> {
    let token = self.next_token(what)?;
    token
      .parse()
      .map_err(|_| MeshFormatError::MalformedNumber {
        what,
        token: token.into_owned(),
      })
  }

  fn skip_line(&mut self) {
    while self.pos < self.bytes.len() && self.bytes[self.pos] != b'\n' {
      self.pos += 1;
    }
    if self.pos < self.bytes.len() {
      self.pos += 1;
    }
  }

  fn read_bytes(&mut self, n: usize, what: &'static str) -> Result<&'a [u8], MeshFormatError> {
    if self.pos + n > self.bytes.len() {
      return Err(MeshFormatError::UnexpectedEof(what));
    }
    let raw = &self.bytes[self.pos..self.pos + n];
    self.pos += n;
    Ok(raw)
  }
}

#[cfg(test)]
mod test {
  use super::*;

  const GOOD_MESH: &str = "\
$MeshFormat
2.2 0 8
$EndMeshFormat
$Nodes
4
10 0 0 0
20 1 0 0
30 0 1 0
40 1 1 0
$EndNodes
$Elements
5
1 1 2 7 1 10 20
2 1 2 7 1 20 40
3 2 2 9 1 10 20 30
4 2 2 11 1 20 40 30
5 2 5 9 1 2 1 -3 10 30 40
$EndElements
";

  #[test]
  fn good_mesh_parses() {
    let mesh = parse_msh_bytes(GOOD_MESH.as_bytes()).unwrap();
    assert_eq!(mesh.n_vertices(), 4);
    assert_eq!(mesh.n_triangles(), 3);
    assert_eq!(mesh.boundary_lines().len(), 2);
  }

  #[test]
  fn sparse_node_ids_are_remapped() {
    let mesh = parse_msh_bytes(GOOD_MESH.as_bytes()).unwrap();
    assert_eq!(mesh.triangle(0).vertices(), [0, 1, 2]);
    assert_eq!(mesh.triangle(2).vertices(), [0, 2, 3]);
    assert_eq!(mesh.boundary_lines()[1].vertices(), [1, 3]);
  }

  #[test]
  fn bounding_box_spans_all_vertices() {
    let mesh = parse_msh_bytes(GOOD_MESH.as_bytes()).unwrap();
    assert_eq!(mesh.min_coord(), Point::new(0.0, 0.0));
    assert_eq!(mesh.max_coord(), Point::new(1.0, 1.0));
  }

  #[test]
  fn tags_are_decoded() {
    let mesh = parse_msh_bytes(GOOD_MESH.as_bytes()).unwrap();
    assert_eq!(mesh.triangle(0).material_id(), 9);
    assert_eq!(mesh.triangle(1).material_id(), 11);
    assert_eq!(mesh.boundary_lines()[0].boundary_id(), 7);

    let partitioned = mesh.triangle(2);
    assert_eq!(partitioned.partition(), 1);
    assert_eq!(partitioned.ghost_partitions(), [3]);
    assert!(mesh.triangle(0).ghost_partitions().is_empty());
  }

  #[test]
  fn bad_header_is_rejected() {
    let msh = "$Garbage\n2.2 0 8\n";
    assert!(matches!(
      parse_msh_bytes(msh.as_bytes()),
      Err(MeshFormatError::BadHeader { .. })
    ));
  }

  #[test]
  fn wrong_version_is_rejected() {
    let msh = "$MeshFormat\n4.1 0 8\n$EndMeshFormat\n";
    assert!(matches!(
      parse_msh_bytes(msh.as_bytes()),
      Err(MeshFormatError::UnsupportedVersion { .. })
    ));
  }

  #[test]
  fn wrong_float_size_is_rejected() {
    let msh = "$MeshFormat\n2.2 0 4\n$EndMeshFormat\n";
    assert!(matches!(
      parse_msh_bytes(msh.as_bytes()),
      Err(MeshFormatError::FloatSizeMismatch { declared: 4, .. })
    ));
  }

  #[test]
  fn duplicate_node_ids_are_rejected() {
    let msh = "\
$MeshFormat
2.2 0 8
$EndMeshFormat
$Nodes
2
10 0 0 0
10 1 0 0
$EndNodes
";
    assert!(matches!(
      parse_msh_bytes(msh.as_bytes()),
      Err(MeshFormatError::DuplicateNodeIds {
        declared: 2,
        distinct: 1
      })
    ));
  }

  #[test]
  fn unknown_element_type_is_rejected() {
    let msh = "\
$MeshFormat
2.2 0 8
$EndMeshFormat
$Nodes
4
1 0 0 0
2 1 0 0
3 0 1 0
4 0 0 1
$EndNodes
$Elements
1
1 4 2 0 0 1 2 3 4
$EndElements
";
    assert!(matches!(
      parse_msh_bytes(msh.as_bytes()),
      Err(MeshFormatError::UnknownElementType { code: 4 })
    ));
  }

  #[test]
  fn element_count_mismatch_is_rejected() {
    let msh = "\
$MeshFormat
2.2 0 8
$EndMeshFormat
$Nodes
3
1 0 0 0
2 1 0 0
3 0 1 0
$EndNodes
$Elements
2
1 2 2 0 0 1 2 3
7 2 2 0 0 1 2 3
$EndElements
";
    assert!(matches!(
      parse_msh_bytes(msh.as_bytes()),
      Err(MeshFormatError::TruncatedElements {
        last: 7,
        declared: 2
      })
    ));
  }

  #[test]
  fn mesh_without_triangles_is_rejected() {
    let msh = "\
$MeshFormat
2.2 0 8
$EndMeshFormat
$Nodes
2
1 0 0 0
2 1 0 0
$EndNodes
$Elements
1
1 1 2 0 0 1 2
$EndElements
";
    assert!(matches!(
      parse_msh_bytes(msh.as_bytes()),
      Err(MeshFormatError::NoTriangles)
    ));
  }

  #[test]
  fn missing_elements_section_is_rejected() {
    let msh = "\
$MeshFormat
2.2 0 8
$EndMeshFormat
$Nodes
1
1 0 0 0
$EndNodes
";
    assert!(matches!(
      parse_msh_bytes(msh.as_bytes()),
      Err(MeshFormatError::NoTriangles)
    ));
  }

  #[test]
  #[should_panic(expected = "unknown node id")]
  fn dangling_node_reference_panics() {
    let msh = "\
$MeshFormat
2.2 0 8
$EndMeshFormat
$Nodes
3
1 0 0 0
2 1 0 0
3 0 1 0
$EndNodes
$Elements
1
1 2 2 0 0 1 2 99
$EndElements
";
    let _ = parse_msh_bytes(msh.as_bytes());
  }

  fn binary_header(sentinel: i32) -> Vec<u8> {
    let mut bytes = b"$MeshFormat\n2.2 1 8\n".to_vec();
    bytes.extend_from_slice(&sentinel.to_ne_bytes());
    bytes.extend_from_slice(b"\n$EndMeshFormat\n");
    bytes
  }

  #[test]
  fn corrupted_binary_sentinel_is_rejected() {
    let bytes = binary_header(0x01020304);
    assert!(matches!(
      parse_msh_bytes(&bytes),
      Err(MeshFormatError::BadBinarySentinel { .. })
    ));
  }

  #[test]
  fn binary_nodes_parse_but_binary_elements_are_rejected() {
    let mut bytes = binary_header(1);
    bytes.extend_from_slice(b"$Nodes\n2\n");
    for (id, coords) in [(5u32, [0.25, 0.5, 0.0]), (6u32, [1.5, -2.0, 0.0])] {
      bytes.extend_from_slice(&id.to_ne_bytes());
      for c in coords {
        bytes.extend_from_slice(&f64::to_ne_bytes(c));
      }
    }
    bytes.extend_from_slice(b"\n$EndNodes\n$Elements\n1\n");

    // Node decoding must have succeeded byte-exactly for the reader to
    // reach the element section and refuse its binary payload.
    assert!(matches!(
      parse_msh_bytes(&bytes),
      Err(MeshFormatError::BinaryElements)
    ));
  }

  #[test]
  fn unknown_sections_are_skipped() {
    let msh = GOOD_MESH.replace(
      "$Nodes",
      "$PhysicalNames\n1\n2 9 \"background\"\n$EndPhysicalNames\n$Nodes",
    );
    let mesh = parse_msh_bytes(msh.as_bytes()).unwrap();
    assert_eq!(mesh.n_triangles(), 3);
  }
}
