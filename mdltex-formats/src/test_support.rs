//! Little-endian buffer builders for unit tests

use crate::{ALTERNATE_HERALD, STANDARD_HERALD};

#[derive(Debug, Default, Clone)]
pub struct ByteWriter {
    buf: Vec<u8>,
}

impl ByteWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn i32(&mut self, v: i32) -> &mut Self {
        self.buf.extend_from_slice(&v.to_le_bytes());
        self
    }

    pub fn u32(&mut self, v: u32) -> &mut Self {
        self.buf.extend_from_slice(&v.to_le_bytes());
        self
    }

    pub fn u16(&mut self, v: u16) -> &mut Self {
        self.buf.extend_from_slice(&v.to_le_bytes());
        self
    }

    pub fn f32s(&mut self, values: &[f32]) -> &mut Self {
        for v in values {
            self.buf.extend_from_slice(&v.to_le_bytes());
        }
        self
    }

    pub fn bytes(&mut self, data: &[u8]) -> &mut Self {
        self.buf.extend_from_slice(data);
        self
    }

    /// NUL-terminated string
    pub fn cstr(&mut self, s: &str) -> &mut Self {
        self.buf.extend_from_slice(s.as_bytes());
        self.buf.push(0);
        self
    }

    /// 9-byte version tag, NUL-padded
    pub fn tag(&mut self, s: &str) -> &mut Self {
        let mut raw = [0u8; 9];
        let n = s.len().min(9);
        raw[..n].copy_from_slice(&s.as_bytes()[..n]);
        self.buf.extend_from_slice(&raw);
        self
    }

    pub fn finish(&self) -> Vec<u8> {
        self.buf.clone()
    }
}

// =============================================================================
// Models
// =============================================================================

pub const TEST_OPAQUE: [u8; 28] = [0xAB; 28];

pub fn model_header(w: &mut ByteWriter, material: &str) {
    w.tag("MDLV0013").i32(7).i32(0).i32(0).cstr(material).i32(0);
}

/// One vertex whose fields are derived from `i`
pub fn vertex(w: &mut ByteWriter, alternate: bool, i: u32) {
    let f = i as f32;
    w.f32s(&[f, f + 0.5, -f]);
    if alternate {
        w.bytes(&TEST_OPAQUE);
    }
    w.u32(i).u32(i + 1).u32(0).u32(0);
    w.f32s(&[0.75, 0.25, 0.0, 0.0]);
    w.f32s(&[f / 10.0, 1.0 - f / 10.0]);
}

pub fn triangles(w: &mut ByteWriter, tris: &[[u16; 3]]) {
    w.u32((tris.len() * 6) as u32);
    for t in tris {
        w.u16(t[0]).u16(t[1]).u16(t[2]);
    }
}

/// Standard-revision mesh: herald, size, vertices, indices
pub fn standard_mesh(vertex_count: u32, tris: &[[u16; 3]]) -> ByteWriter {
    let mut w = ByteWriter::new();
    model_header(&mut w, "materials/puppet.json");
    w.u32(STANDARD_HERALD).u32(vertex_count * 52);
    for i in 0..vertex_count {
        vertex(&mut w, false, i);
    }
    triangles(&mut w, tris);
    w
}

/// Alternate-revision mesh: zero word, padding, herald, size, vertices, indices
pub fn alternate_mesh(vertex_count: u32, padding_words: usize, tris: &[[u16; 3]]) -> ByteWriter {
    let mut w = ByteWriter::new();
    model_header(&mut w, "puppet.json");
    w.u32(0);
    for _ in 0..padding_words {
        w.u32(0x1234);
    }
    w.u32(ALTERNATE_HERALD).u32(vertex_count * 80);
    for i in 0..vertex_count {
        vertex(&mut w, true, i);
    }
    triangles(&mut w, tris);
    w
}

pub fn identity_matrix() -> [f32; 16] {
    [
        1.0, 0.0, 0.0, 0.0, //
        0.0, 1.0, 0.0, 0.0, //
        0.0, 0.0, 1.0, 0.0, //
        0.0, 0.0, 0.0, 1.0,
    ]
}

pub fn translation_matrix(x: f32, y: f32, z: f32) -> [f32; 16] {
    let mut m = identity_matrix();
    m[12] = x;
    m[13] = y;
    m[14] = z;
    m
}

/// One bone record; `matrix = None` writes an 8-byte opaque payload
pub fn bone(w: &mut ByteWriter, name: &str, parent: u32, matrix: Option<[f32; 16]>, sim: &str) {
    w.cstr(name).i32(0).u32(parent);
    match matrix {
        Some(m) => {
            w.u32(64).f32s(&m);
        }
        None => {
            w.u32(8).bytes(&[1, 2, 3, 4, 5, 6, 7, 8]);
        }
    }
    w.cstr(sim);
}

pub fn skeleton_header(w: &mut ByteWriter, bone_count: u16) {
    w.tag("MDLS0002").u32(0).u16(bone_count).u16(0);
}

/// One animation track of `frames` frames plus `padding` trailing bytes
pub fn track(w: &mut ByteWriter, id: i32, frames: usize, padding: usize) {
    w.i32(id).u32((frames * 36 + padding) as u32);
    for f in 0..frames {
        let v = f as f32;
        w.f32s(&[v, 0.0, 0.0, 0.0, v * 0.5, 0.0, 1.0, 1.0, 1.0]);
    }
    w.bytes(&vec![0u8; padding]);
}

pub fn animation_record(w: &mut ByteWriter, id: i32, name: &str, mode: &str, tracks: &[(i32, usize)]) {
    w.i32(id).i32(0).cstr(name).cstr(mode);
    w.f32s(&[30.0]).i32(24).i32(0).u32(tracks.len() as u32);
    for &(track_id, frames) in tracks {
        track(w, track_id, frames, 0);
    }
}

pub fn animation_header(w: &mut ByteWriter, count: u32) {
    w.tag("MDLA0005").u32(0).u32(count);
}

// =============================================================================
// Textures
// =============================================================================

/// Texture header words plus the trailing reserved word
pub fn texture_header(w: &mut ByteWriter, format: i32, tw: i32, th: i32, iw: i32, ih: i32) {
    w.i32(format).i32(0).i32(tw).i32(th).i32(iw).i32(ih).i32(0);
}

/// 8-byte container tag, e.g. "TEXB0003"
pub fn container_tag(w: &mut ByteWriter, version: u32) {
    w.bytes(format!("TEXB000{}", version).as_bytes());
}
