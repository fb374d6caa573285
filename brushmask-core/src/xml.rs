//! `<MaskGenerator …/>` fragments.
//!
//! ```xml
//! <MaskGenerator type="circle" id="soft" diameter="64" ratio="1" hfade="0"
//!                vfade="0" spikes="2" antialiasEdges="0"
//!                softness_curve="0,1;1,0;"/>
//! ```

use std::fmt::Write;
use std::str::FromStr;

use crate::codec::{CurveCodec, PointListCodec};
use crate::document::MaskDocument;
use crate::error::{MaskError, MaskResult};
use crate::generator::{MaskGenerator, MaskId, MaskShape};

/// Element name of a mask fragment.
pub const ELEMENT_NAME: &str = "MaskGenerator";

impl MaskDocument {
    /// Write the description as an XML fragment.
    #[must_use]
    pub fn to_xml(&self) -> String {
        let mut out = String::from("<");
        out.push_str(ELEMENT_NAME);
        push_attr(&mut out, "type", self.shape.as_str());
        push_attr(&mut out, "id", self.id.as_str());
        push_attr(&mut out, "diameter", self.diameter);
        push_attr(&mut out, "ratio", self.ratio);
        push_attr(&mut out, "hfade", self.horizontal_fade);
        push_attr(&mut out, "vfade", self.vertical_fade);
        push_attr(&mut out, "spikes", self.spikes);
        push_attr(&mut out, "antialiasEdges", u8::from(self.antialias_edges));
        if let Some(curve) = &self.softness_curve {
            push_attr(&mut out, "softness_curve", curve);
        }
        out.push_str("/>");
        out
    }

    /// Parse an XML fragment.
    ///
    /// The first `MaskGenerator` element is used, or the root element if
    /// there is none. Missing attributes take their defaults and `radius`
    /// is accepted in place of `diameter`. An unknown `id` yields a default
    /// circle with antialiased edges.
    ///
    /// # Errors
    ///
    /// Returns an error if the XML is malformed, an attribute cannot be
    /// parsed or the outline shape is unknown.
    pub fn from_xml(xml: &str) -> MaskResult<Self> {
        let doc = roxmltree::Document::parse(xml)?;
        let node = doc
            .descendants()
            .find(|n| n.has_tag_name(ELEMENT_NAME))
            .unwrap_or_else(|| doc.root_element());

        let shape = match node.attribute("type").unwrap_or("circle") {
            "circle" => MaskShape::Circle,
            "rect" => MaskShape::Rectangle,
            other => {
                return Err(MaskError::InvalidAttribute {
                    name: "type".to_string(),
                    value: other.to_string(),
                })
            }
        };

        let diameter = match node.attribute("diameter") {
            Some(_) => parse_attr(node, "diameter", 1.0)?,
            None => parse_attr(node, "radius", 1.0)?,
        };

        let mut document = Self {
            id: MaskId::Default,
            shape,
            diameter,
            ratio: parse_attr(node, "ratio", 1.0)?,
            horizontal_fade: parse_attr(node, "hfade", 0.0)?,
            vertical_fade: parse_attr(node, "vfade", 0.0)?,
            spikes: parse_attr(node, "spikes", 2)?,
            antialias_edges: parse_flag(node, "antialiasEdges")?,
            softness_curve: node.attribute("softness_curve").map(str::to_string),
        };

        let id = node.attribute("id").unwrap_or(MaskId::Default.as_str());
        if let Some(id) = MaskId::from_name(id) {
            document.id = id;
        } else {
            tracing::warn!("Unknown mask id '{id}', using an antialiased default circle");
            document.antialias_edges = true;
        }
        if document.id != MaskId::Soft {
            document.softness_curve = None;
        }

        Ok(document)
    }
}

impl MaskGenerator {
    /// Write the generator's construction parameters as an XML fragment.
    #[must_use]
    pub fn to_xml(&self) -> String {
        MaskDocument::from(self).to_xml()
    }

    /// Build a generator from an XML fragment, decoding curves with
    /// [`PointListCodec`].
    ///
    /// # Errors
    ///
    /// See [`MaskDocument::from_xml`] and [`MaskDocument::into_generator`].
    pub fn from_xml(xml: &str) -> MaskResult<Self> {
        Self::from_xml_with_codec(xml, &PointListCodec)
    }

    /// Build a generator from an XML fragment, decoding curves with `codec`.
    ///
    /// # Errors
    ///
    /// See [`MaskDocument::from_xml`] and [`MaskDocument::into_generator`].
    pub fn from_xml_with_codec(xml: &str, codec: &dyn CurveCodec) -> MaskResult<Self> {
        MaskDocument::from_xml(xml)?.into_generator_with_codec(codec)
    }
}

fn push_attr(out: &mut String, name: &str, value: impl std::fmt::Display) {
    let value = value.to_string();
    // Writing to a String cannot fail.
    let _ = write!(out, " {name}=\"{}\"", escape(&value));
}

fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn parse_attr<T: FromStr>(node: roxmltree::Node<'_, '_>, name: &str, default: T) -> MaskResult<T> {
    match node.attribute(name) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| MaskError::InvalidAttribute {
            name: name.to_string(),
            value: raw.to_string(),
        }),
    }
}

fn parse_flag(node: roxmltree::Node<'_, '_>, name: &str) -> MaskResult<bool> {
    match node.attribute(name).map(str::trim) {
        None | Some("0" | "false") => Ok(false),
        Some("1" | "true") => Ok(true),
        Some(other) => Err(MaskError::InvalidAttribute {
            name: name.to_string(),
            value: other.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::CubicCurve;
    use crate::generator::{CurveCircleMaskGenerator, GaussCircleMaskGenerator};
    use crate::geometry::MaskParams;

    #[test]
    fn test_to_xml_attributes() {
        let generator: MaskGenerator = CurveCircleMaskGenerator::new(
            MaskParams::new(64.0).with_antialias_edges(true),
            &CubicCurve::linear_falloff(),
        )
        .into();
        let xml = generator.to_xml();
        assert!(xml.starts_with("<MaskGenerator "));
        assert!(xml.contains(r#"type="circle""#));
        assert!(xml.contains(r#"id="soft""#));
        assert!(xml.contains(r#"diameter="64""#));
        assert!(xml.contains(r#"antialiasEdges="1""#));
        assert!(xml.contains(r#"softness_curve="0,1;1,0;""#));
        assert!(xml.ends_with("/>"));
    }

    #[test]
    fn test_gauss_has_no_curve_attribute() {
        let generator: MaskGenerator = GaussCircleMaskGenerator::new(MaskParams::new(10.0)).into();
        assert!(!generator.to_xml().contains("softness_curve"));
    }

    #[test]
    fn test_defaults_for_missing_attributes() {
        let doc = MaskDocument::from_xml("<MaskGenerator/>").expect("parses");
        assert_eq!(doc, MaskDocument::default());
    }

    #[test]
    fn test_legacy_radius_attribute() {
        let doc = MaskDocument::from_xml(r#"<MaskGenerator radius="12.5" id="gauss"/>"#)
            .expect("parses");
        assert!((doc.diameter - 12.5).abs() < f64::EPSILON);
        assert_eq!(doc.id, MaskId::Gauss);
    }

    #[test]
    fn test_nested_element_is_found() {
        let xml = r#"<brush><MaskGenerator id="soft" diameter="9"/></brush>"#;
        let generator = MaskGenerator::from_xml(xml).expect("parses");
        assert_eq!(generator.id(), MaskId::Soft);
        assert!((generator.base().diameter() - 9.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_unknown_id_falls_back_to_antialiased_circle() {
        let generator =
            MaskGenerator::from_xml(r#"<MaskGenerator id="pixel" diameter="20"/>"#).expect("falls back");
        assert_eq!(generator.id(), MaskId::Default);
        assert!(generator.base().antialias_edges());
    }

    #[test]
    fn test_rect_is_unsupported() {
        let result = MaskGenerator::from_xml(r#"<MaskGenerator type="rect" diameter="20"/>"#);
        assert!(matches!(result, Err(MaskError::UnsupportedShape(_))));
    }

    #[test]
    fn test_huge_diameter_is_an_error() {
        let result = MaskGenerator::from_xml(r#"<MaskGenerator id="soft" diameter="1e18"/>"#);
        assert!(matches!(
            result,
            Err(MaskError::InvalidAttribute { name, .. }) if name == "diameter"
        ));

        let legacy = MaskGenerator::from_xml(r#"<MaskGenerator id="gauss" radius="inf"/>"#);
        assert!(legacy.is_err());
    }

    #[test]
    fn test_bad_attributes() {
        assert!(matches!(
            MaskDocument::from_xml(r#"<MaskGenerator diameter="wide"/>"#),
            Err(MaskError::InvalidAttribute { name, .. }) if name == "diameter"
        ));
        assert!(matches!(
            MaskDocument::from_xml(r#"<MaskGenerator antialiasEdges="yes"/>"#),
            Err(MaskError::InvalidAttribute { .. })
        ));
        assert!(matches!(
            MaskDocument::from_xml(r#"<MaskGenerator type="star"/>"#),
            Err(MaskError::InvalidAttribute { .. })
        ));
        assert!(matches!(
            MaskDocument::from_xml("<MaskGenerator"),
            Err(MaskError::Xml(_))
        ));
    }

    #[test]
    fn test_escaping() {
        assert_eq!(escape(r#"a<b>&"c""#), "a&lt;b&gt;&amp;&quot;c&quot;");
    }
}
