//! Static font-metric tables for the four standard PDF faces the templates draw with.
//!
//! Widths are in em units (relative to font size), taken from the Adobe core-font AFM files
//! and rounded to three places. Both renderers measure through these tables, so wrapping and
//! right-alignment agree with what the PDF viewer draws for the same base font.
//! All tables cover ASCII 0x20..=0x7E (95 printable characters).
//! Index = (char as usize) - 32.

use serde::{Deserialize, Serialize};

use super::geometry::MM_PER_PT;

// ────────────────────────────────────────────────────────────────────────────
// Faces
// ────────────────────────────────────────────────────────────────────────────

/// A template's type family. Weight is picked per text role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Typeface {
    /// Helvetica, used by every template except `technical`.
    Sans,
    /// Courier, for the code-styled `technical` template.
    Mono,
}

impl Typeface {
    pub fn regular(self) -> FontFace {
        match self {
            Typeface::Sans => FontFace::Helvetica,
            Typeface::Mono => FontFace::Courier,
        }
    }

    pub fn bold(self) -> FontFace {
        match self {
            Typeface::Sans => FontFace::HelveticaBold,
            Typeface::Mono => FontFace::CourierBold,
        }
    }
}

/// One concrete face. Each maps to a PDF standard Type1 font, so nothing is embedded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FontFace {
    Helvetica,
    HelveticaBold,
    Courier,
    CourierBold,
}

impl FontFace {
    pub const ALL: [FontFace; 4] = [
        FontFace::Helvetica,
        FontFace::HelveticaBold,
        FontFace::Courier,
        FontFace::CourierBold,
    ];

    /// `/BaseFont` name in the PDF font dictionary.
    pub fn base_font(self) -> &'static str {
        match self {
            FontFace::Helvetica => "Helvetica",
            FontFace::HelveticaBold => "Helvetica-Bold",
            FontFace::Courier => "Courier",
            FontFace::CourierBold => "Courier-Bold",
        }
    }

    /// Resource name used in content streams (`/F1 10 Tf`).
    pub fn resource_name(self) -> &'static str {
        match self {
            FontFace::Helvetica => "F1",
            FontFace::HelveticaBold => "F2",
            FontFace::Courier => "F3",
            FontFace::CourierBold => "F4",
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Font metric table
// ────────────────────────────────────────────────────────────────────────────

/// Static character-width table for a face.
///
/// `widths[i]` = width of ASCII character `(i + 32)`, covering 0x20 (space) through 0x7E (~).
///
/// Width array slot layout:
/// ```text
/// [0]=sp  [1]=!   [2]="   [3]=#   [4]=$   [5]=%   [6]=&   [7]='
/// [8]=(   [9]=)   [10]=*  [11]=+  [12]=,  [13]=-  [14]=.  [15]=/
/// [16..25]=0-9
/// [26]=:  [27]=;  [28]=<  [29]==  [30]=>  [31]=?  [32]=@
/// [33..58]=A-Z
/// [59]=[  [60]=\  [61]=]  [62]=^  [63]=_  [64]=`
/// [65..90]=a-z
/// [91]={  [92]=|  [93]=}  [94]=~
/// ```
pub struct FontMetricTable {
    pub face: FontFace,
    widths: [f32; 95],
    /// Fallback width for Latin-1 letters and anything else outside the table.
    pub average_char_width: f32,
    pub space_width: f32,
    monospaced: bool,
}

impl FontMetricTable {
    /// Width of one character in em units.
    pub fn char_width(&self, c: char) -> f32 {
        if self.monospaced {
            return self.space_width;
        }
        let code = c as usize;
        if (32..=126).contains(&code) {
            return self.widths[code - 32];
        }
        match c {
            '\u{2022}' => 0.350,             // bullet
            '\u{00B7}' => 0.278,             // middle dot
            '\u{2013}' => 0.556,             // en dash
            '\u{2014}' | '\u{2026}' => 1.0,  // em dash, ellipsis
            '\u{2018}' | '\u{2019}' => 0.222,
            '\u{201C}' | '\u{201D}' => 0.333,
            '\u{00A0}' => self.space_width,
            _ => self.average_char_width,
        }
    }

    /// Measures the rendered width of a string in em units.
    pub fn measure_str(&self, s: &str) -> f32 {
        s.chars().map(|c| self.char_width(c)).sum()
    }

    /// Rendered width in millimetres at `size_pt`.
    pub fn width_mm(&self, s: &str, size_pt: f32) -> f32 {
        self.measure_str(s) * size_pt * MM_PER_PT
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Static width tables  (95 ASCII printable characters each)
// ────────────────────────────────────────────────────────────────────────────

static HELVETICA_TABLE: FontMetricTable = FontMetricTable {
    face: FontFace::Helvetica,
    #[rustfmt::skip]
    widths: [
        // sp     !      "      #      $      %      &      '      (      )      *      +      ,      -      .      /
        0.278, 0.278, 0.355, 0.556, 0.556, 0.889, 0.667, 0.191, 0.333, 0.333, 0.389, 0.584, 0.278, 0.333, 0.278, 0.278,
        // 0-9
        0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556,
        // :      ;      <      =      >      ?      @
        0.278, 0.278, 0.584, 0.584, 0.584, 0.556, 1.015,
        // A      B      C      D      E      F      G      H      I      J      K      L      M
        0.667, 0.667, 0.722, 0.722, 0.667, 0.611, 0.778, 0.722, 0.278, 0.500, 0.667, 0.556, 0.833,
        // N      O      P      Q      R      S      T      U      V      W      X      Y      Z
        0.722, 0.778, 0.667, 0.778, 0.722, 0.667, 0.611, 0.722, 0.667, 0.944, 0.667, 0.667, 0.611,
        // [      \      ]      ^      _      `
        0.278, 0.278, 0.278, 0.469, 0.556, 0.333,
        // a      b      c      d      e      f      g      h      i      j      k      l      m
        0.556, 0.556, 0.500, 0.556, 0.556, 0.278, 0.556, 0.556, 0.222, 0.222, 0.500, 0.222, 0.833,
        // n      o      p      q      r      s      t      u      v      w      x      y      z
        0.556, 0.556, 0.556, 0.556, 0.333, 0.500, 0.278, 0.556, 0.500, 0.722, 0.500, 0.500, 0.500,
        // {      |      }      ~
        0.334, 0.260, 0.334, 0.584,
    ],
    average_char_width: 0.556,
    space_width: 0.278,
    monospaced: false,
};

static HELVETICA_BOLD_TABLE: FontMetricTable = FontMetricTable {
    face: FontFace::HelveticaBold,
    #[rustfmt::skip]
    widths: [
        // sp     !      "      #      $      %      &      '      (      )      *      +      ,      -      .      /
        0.278, 0.333, 0.474, 0.556, 0.556, 0.889, 0.722, 0.238, 0.333, 0.333, 0.389, 0.584, 0.278, 0.333, 0.278, 0.278,
        // 0-9
        0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556,
        // :      ;      <      =      >      ?      @
        0.333, 0.333, 0.584, 0.584, 0.584, 0.611, 0.975,
        // A      B      C      D      E      F      G      H      I      J      K      L      M
        0.722, 0.722, 0.722, 0.722, 0.667, 0.611, 0.778, 0.722, 0.278, 0.556, 0.722, 0.611, 0.833,
        // N      O      P      Q      R      S      T      U      V      W      X      Y      Z
        0.722, 0.778, 0.667, 0.778, 0.722, 0.667, 0.611, 0.722, 0.667, 0.944, 0.667, 0.667, 0.611,
        // [      \      ]      ^      _      `
        0.333, 0.278, 0.333, 0.584, 0.556, 0.333,
        // a      b      c      d      e      f      g      h      i      j      k      l      m
        0.556, 0.611, 0.556, 0.611, 0.556, 0.333, 0.611, 0.611, 0.278, 0.278, 0.556, 0.278, 0.889,
        // n      o      p      q      r      s      t      u      v      w      x      y      z
        0.611, 0.611, 0.611, 0.611, 0.389, 0.556, 0.333, 0.611, 0.556, 0.778, 0.556, 0.556, 0.500,
        // {      |      }      ~
        0.389, 0.280, 0.389, 0.584,
    ],
    average_char_width: 0.611,
    space_width: 0.278,
    monospaced: false,
};

// Courier is fixed pitch, every glyph advances 0.6 em.
static COURIER_TABLE: FontMetricTable = FontMetricTable {
    face: FontFace::Courier,
    widths: [0.6; 95],
    average_char_width: 0.6,
    space_width: 0.6,
    monospaced: true,
};

static COURIER_BOLD_TABLE: FontMetricTable = FontMetricTable {
    face: FontFace::CourierBold,
    widths: [0.6; 95],
    average_char_width: 0.6,
    space_width: 0.6,
    monospaced: true,
};

/// Returns the static metric table for a face.
pub fn get_metrics(face: FontFace) -> &'static FontMetricTable {
    match face {
        FontFace::Helvetica => &HELVETICA_TABLE,
        FontFace::HelveticaBold => &HELVETICA_BOLD_TABLE,
        FontFace::Courier => &COURIER_TABLE,
        FontFace::CourierBold => &COURIER_BOLD_TABLE,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measure_str_empty_returns_zero() {
        let metrics = get_metrics(FontFace::Helvetica);
        assert_eq!(metrics.measure_str(""), 0.0);
    }

    #[test]
    fn test_measure_str_ascii_characters() {
        let metrics = get_metrics(FontFace::Helvetica);
        // "Rust" = R(0.722) + u(0.556) + s(0.500) + t(0.278) = 2.056
        let width = metrics.measure_str("Rust");
        assert!(
            (width - 2.056).abs() < 1e-3,
            "Rust width should be ~2.056, got {width}"
        );
    }

    #[test]
    fn test_bold_is_wider_than_regular() {
        let text = "Senior Software Engineer";
        let regular = get_metrics(FontFace::Helvetica).measure_str(text);
        let bold = get_metrics(FontFace::HelveticaBold).measure_str(text);
        assert!(bold > regular, "bold {bold} should exceed regular {regular}");
    }

    #[test]
    fn test_courier_is_fixed_pitch() {
        let metrics = get_metrics(FontFace::Courier);
        assert_eq!(metrics.measure_str("iiii"), metrics.measure_str("MMMM"));
        assert!((metrics.measure_str("abcde") - 3.0).abs() < 1e-4);
    }

    #[test]
    fn test_non_ascii_falls_back() {
        let metrics = get_metrics(FontFace::Helvetica);
        let width = metrics.measure_str("é");
        assert!(
            (width - metrics.average_char_width).abs() < 1e-4,
            "non-ASCII should use average_char_width"
        );
        assert!((metrics.measure_str("\u{2022}") - 0.35).abs() < 1e-4);
    }

    #[test]
    fn test_width_mm_scales_with_size() {
        let metrics = get_metrics(FontFace::Helvetica);
        let small = metrics.width_mm("Experience", 10.0);
        let large = metrics.width_mm("Experience", 20.0);
        assert!((large - 2.0 * small).abs() < 1e-4);
        // 10pt "M" = 0.833em * 10pt * 0.3528 mm/pt
        let m = metrics.width_mm("M", 10.0);
        assert!((m - 2.939).abs() < 0.01, "got {m}");
    }

    #[test]
    fn test_every_face_has_a_distinct_resource_name() {
        let mut names: Vec<_> = FontFace::ALL.iter().map(|f| f.resource_name()).collect();
        names.dedup();
        assert_eq!(names.len(), 4);
        for face in FontFace::ALL {
            assert_eq!(get_metrics(face).face, face);
        }
    }
}
