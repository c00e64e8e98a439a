//! Wavefront OBJ writer for decoded model geometry

use anyhow::Result;
use mdltex_formats::ModelDocument;
use std::io::Write;

/// Material library name derived from the header's material reference
///
/// Takes the base name after the last `/` or `\`, swaps `.json` for
/// `.mtl`, and falls back to `unknown.mtl` when there is no reference.
pub fn material_library_name(material: Option<&str>) -> String {
    let base = material
        .map(|m| m.rsplit(['/', '\\']).next().unwrap_or(m))
        .unwrap_or("");
    if base.is_empty() {
        return "unknown.mtl".to_string();
    }
    match base.strip_suffix(".json") {
        Some(stem) => format!("{}.mtl", stem),
        None => base.to_string(),
    }
}

/// Write positions, UVs and faces as OBJ text
///
/// Face indices are 1-based and reference the vertex and UV with the same
/// index, since the container stores one UV per vertex.
pub fn write_obj<W: Write>(w: &mut W, doc: &ModelDocument, source_name: &str) -> Result<()> {
    writeln!(w, "# Exported from {}", source_name)?;
    writeln!(w, "mtllib {}", material_library_name(doc.material_file()))?;

    for v in &doc.vertices {
        let [x, y, z] = v.position;
        writeln!(w, "v {:.6} {:.6} {:.6}", x, y, z)?;
    }
    for v in &doc.vertices {
        let [u, t] = v.uv;
        writeln!(w, "vt {:.6} {:.6}", u, t)?;
    }
    for tri in &doc.triangles {
        let [a, b, c] = tri.map(|i| i as u32 + 1);
        writeln!(w, "f {a}/{a} {b}/{b} {c}/{c}")?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mdltex_formats::{ModelHeader, Vertex};

    fn doc_with(material: &str) -> ModelDocument {
        ModelDocument {
            header: Some(ModelHeader {
                material_file: material.to_string(),
                ..Default::default()
            }),
            vertices: vec![Vertex {
                position: [1.0, -2.5, 0.125],
                uv: [0.5, 1.0],
                opaque: None,
            }],
            triangles: vec![[2, 5, 9]],
            ..Default::default()
        }
    }

    #[test]
    fn test_obj_lines() {
        let mut out = Vec::new();
        write_obj(&mut out, &doc_with("materials/body.json"), "body.mdl").unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(
            lines,
            [
                "# Exported from body.mdl",
                "mtllib body.mtl",
                "v 1.000000 -2.500000 0.125000",
                "vt 0.500000 1.000000",
                "f 3/3 6/6 10/10",
            ]
        );
    }

    #[test]
    fn test_material_library_name() {
        assert_eq!(material_library_name(Some("a/b/c.json")), "c.mtl");
        assert_eq!(material_library_name(Some("dir\\skin.json")), "skin.mtl");
        assert_eq!(material_library_name(Some("plain")), "plain");
        assert_eq!(
            material_library_name(Some("skins/a.json.bak.json")),
            "a.json.bak.mtl"
        );
        assert_eq!(material_library_name(Some("x.json.bak")), "x.json.bak");
        assert_eq!(material_library_name(Some("")), "unknown.mtl");
        assert_eq!(material_library_name(None), "unknown.mtl");
    }
}
