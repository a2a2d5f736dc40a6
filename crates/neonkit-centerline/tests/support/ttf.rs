//! Minimal TrueType writer for tests.
//!
//! Emits just the tables a font reader needs to map characters and draw
//! outlines: `cmap` (format 12), `glyf`, `head`, `hhea`, `hmtx`, `loca`
//! (long offsets) and `maxp` (version 0.5). Outlines are straight segments
//! only; every point is on-curve. Glyph 0 is an empty `.notdef`.

pub struct TtfGlyph {
    pub character: char,
    pub contours: Vec<Vec<(i16, i16)>>,
    pub advance: u16,
}

pub struct TtfBuilder {
    units_per_em: u16,
    ascender: i16,
    descender: i16,
    glyphs: Vec<TtfGlyph>,
}

impl TtfBuilder {
    pub fn new(units_per_em: u16) -> Self {
        Self {
            units_per_em,
            ascender: (units_per_em as i32 * 4 / 5) as i16,
            descender: -((units_per_em as i32 / 5) as i16),
            glyphs: Vec::new(),
        }
    }

    pub fn glyph(mut self, character: char, contours: Vec<Vec<(i16, i16)>>, advance: u16) -> Self {
        self.glyphs.push(TtfGlyph {
            character,
            contours,
            advance,
        });
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let num_glyphs = self.glyphs.len() as u16 + 1;

        let mut glyf = Vec::new();
        let mut loca = vec![0u32];
        let mut hmtx = Vec::new();
        put_u16(&mut hmtx, 0);
        put_i16(&mut hmtx, 0);
        for g in &self.glyphs {
            let lsb = encode_glyph(&mut glyf, &g.contours);
            loca.push(glyf.len() as u32);
            put_u16(&mut hmtx, g.advance);
            put_i16(&mut hmtx, lsb);
        }
        let mut loca_bytes = Vec::new();
        for offset in loca {
            put_u32(&mut loca_bytes, offset);
        }

        let tables: Vec<([u8; 4], Vec<u8>)> = vec![
            (*b"cmap", self.cmap()),
            (*b"glyf", glyf),
            (*b"head", self.head()),
            (*b"hhea", self.hhea(num_glyphs)),
            (*b"hmtx", hmtx),
            (*b"loca", loca_bytes),
            (*b"maxp", maxp(num_glyphs)),
        ];
        assemble(&tables)
    }

    fn cmap(&self) -> Vec<u8> {
        let mut groups: Vec<(u32, u32)> = self
            .glyphs
            .iter()
            .enumerate()
            .map(|(i, g)| (g.character as u32, i as u32 + 1))
            .collect();
        groups.sort();

        let mut out = Vec::new();
        put_u16(&mut out, 0); // version
        put_u16(&mut out, 1); // subtables
        put_u16(&mut out, 3); // Windows
        put_u16(&mut out, 10); // Unicode full repertoire
        put_u32(&mut out, 12);

        put_u16(&mut out, 12); // format
        put_u16(&mut out, 0);
        put_u32(&mut out, 16 + 12 * groups.len() as u32);
        put_u32(&mut out, 0); // language
        put_u32(&mut out, groups.len() as u32);
        for (code, glyph) in groups {
            put_u32(&mut out, code);
            put_u32(&mut out, code);
            put_u32(&mut out, glyph);
        }
        out
    }

    fn head(&self) -> Vec<u8> {
        let mut out = Vec::new();
        put_u32(&mut out, 0x0001_0000); // version
        put_u32(&mut out, 0x0001_0000); // font revision
        put_u32(&mut out, 0); // checksum adjustment
        put_u32(&mut out, 0x5F0F_3CF5); // magic
        put_u16(&mut out, 0); // flags
        put_u16(&mut out, self.units_per_em);
        out.extend_from_slice(&[0u8; 16]); // created, modified
        put_i16(&mut out, 0);
        put_i16(&mut out, self.descender);
        put_i16(&mut out, self.units_per_em as i16);
        put_i16(&mut out, self.ascender);
        put_u16(&mut out, 0); // mac style
        put_u16(&mut out, 8); // lowest rec ppem
        put_i16(&mut out, 2); // direction hint
        put_i16(&mut out, 1); // long loca offsets
        put_i16(&mut out, 0); // glyph data format
        out
    }

    fn hhea(&self, num_glyphs: u16) -> Vec<u8> {
        let max_advance = self.glyphs.iter().map(|g| g.advance).max().unwrap_or(0);
        let mut out = Vec::new();
        put_u32(&mut out, 0x0001_0000);
        put_i16(&mut out, self.ascender);
        put_i16(&mut out, self.descender);
        put_i16(&mut out, 0); // line gap
        put_u16(&mut out, max_advance);
        out.extend_from_slice(&[0u8; 6]); // min lsb, min rsb, x max extent
        put_i16(&mut out, 1); // caret slope rise
        put_i16(&mut out, 0); // caret slope run
        put_i16(&mut out, 0); // caret offset
        out.extend_from_slice(&[0u8; 8]); // reserved
        put_i16(&mut out, 0); // metric data format
        put_u16(&mut out, num_glyphs);
        out
    }
}

fn maxp(num_glyphs: u16) -> Vec<u8> {
    let mut out = Vec::new();
    put_u32(&mut out, 0x0000_5000);
    put_u16(&mut out, num_glyphs);
    out
}

/// Appends one simple glyph and returns its left side bearing.
fn encode_glyph(glyf: &mut Vec<u8>, contours: &[Vec<(i16, i16)>]) -> i16 {
    let points: Vec<(i16, i16)> = contours.iter().flatten().copied().collect();
    if points.is_empty() {
        return 0;
    }
    let x_min = points.iter().map(|p| p.0).min().unwrap_or(0);
    let y_min = points.iter().map(|p| p.1).min().unwrap_or(0);
    let x_max = points.iter().map(|p| p.0).max().unwrap_or(0);
    let y_max = points.iter().map(|p| p.1).max().unwrap_or(0);

    put_i16(glyf, contours.len() as i16);
    put_i16(glyf, x_min);
    put_i16(glyf, y_min);
    put_i16(glyf, x_max);
    put_i16(glyf, y_max);

    let mut end = 0u16;
    for contour in contours {
        end += contour.len() as u16;
        put_u16(glyf, end - 1);
    }
    put_u16(glyf, 0); // instruction length

    glyf.extend(std::iter::repeat(0x01u8).take(points.len()));
    let mut last = 0i16;
    for p in &points {
        put_i16(glyf, p.0 - last);
        last = p.0;
    }
    last = 0;
    for p in &points {
        put_i16(glyf, p.1 - last);
        last = p.1;
    }
    if glyf.len() % 2 == 1 {
        glyf.push(0);
    }
    x_min
}

fn assemble(tables: &[([u8; 4], Vec<u8>)]) -> Vec<u8> {
    let count = tables.len() as u16;
    let mut out = Vec::new();
    put_u32(&mut out, 0x0001_0000);
    put_u16(&mut out, count);
    put_u16(&mut out, 64); // search range
    put_u16(&mut out, 2); // entry selector
    put_u16(&mut out, count * 16 - 64); // range shift

    let mut offset = 12 + 16 * tables.len() as u32;
    let mut body = Vec::new();
    for (tag, data) in tables {
        out.extend_from_slice(tag);
        put_u32(&mut out, 0); // checksum
        put_u32(&mut out, offset);
        put_u32(&mut out, data.len() as u32);

        body.extend_from_slice(data);
        while body.len() % 4 != 0 {
            body.push(0);
        }
        offset = 12 + 16 * tables.len() as u32 + body.len() as u32;
    }
    out.extend_from_slice(&body);
    out
}

fn put_u16(out: &mut Vec<u8>, v: u16) {
    out.extend_from_slice(&v.to_be_bytes());
}

fn put_i16(out: &mut Vec<u8>, v: i16) {
    out.extend_from_slice(&v.to_be_bytes());
}

fn put_u32(out: &mut Vec<u8>, v: u32) {
    out.extend_from_slice(&v.to_be_bytes());
}
