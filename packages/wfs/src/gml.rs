//! GML 2 `FeatureCollection` parser for cadastral parcels.
//!
//! Streams the response with a namespace-aware reader and collects, for
//! every `gml:featureMember`, the first `gml:coordinates`, `sop:pnu`, and
//! `sop:lnm_lndcgr_smbol` found beneath it. Members that lack geometry or
//! a category symbol are skipped, not reported as errors.

use parcel_map_parcel_models::{GeometryError, ParcelRecord, polygon_from_coordinates};
use quick_xml::events::Event;
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::reader::NsReader;
use thiserror::Error;

/// GML geometry namespace.
pub const GML_NS: &str = "http://www.opengis.net/gml";
/// VWorld attribute namespace.
pub const SOP_NS: &str = "https://www.vworld.kr";

const FEATURE_MEMBER: &[u8] = b"featureMember";
const COORDINATES: &[u8] = b"coordinates";
const PNU: &[u8] = b"pnu";
const CATEGORY_SYMBOL: &[u8] = b"lnm_lndcgr_smbol";

/// The response body is not a well-formed XML document.
#[derive(Debug, Error)]
pub enum GmlError {
    /// The XML reader rejected the document.
    #[error("Malformed XML: {message}")]
    Malformed {
        /// Reader error description.
        message: String,
    },

    /// The document ended before every element was closed, or contained
    /// no element at all.
    #[error("Incomplete XML document: {message}")]
    Incomplete {
        /// What was missing.
        message: String,
    },
}

/// Raw text of the fields of interest inside one `gml:featureMember`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawFeatureMember {
    /// `sop:pnu` text.
    pub pnu: Option<String>,
    /// `sop:lnm_lndcgr_smbol` text.
    pub symbol: Option<String>,
    /// `gml:coordinates` text.
    pub coordinates: Option<String>,
}

/// Result of parsing a whole response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedFeatures {
    /// Number of `gml:featureMember` elements seen, including skipped ones.
    pub member_count: usize,
    /// Records that had both geometry and a category symbol.
    pub records: Vec<ParcelRecord>,
}

/// Which field a text run is being collected for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Pnu,
    Symbol,
    Coordinates,
}

impl Field {
    fn resolve(ns: &[u8], local: &[u8]) -> Option<Self> {
        if ns == GML_NS.as_bytes() && local == COORDINATES {
            Some(Self::Coordinates)
        } else if ns == SOP_NS.as_bytes() && local == PNU {
            Some(Self::Pnu)
        } else if ns == SOP_NS.as_bytes() && local == CATEGORY_SYMBOL {
            Some(Self::Symbol)
        } else {
            None
        }
    }
}

impl RawFeatureMember {
    fn slot(&mut self, field: Field) -> &mut Option<String> {
        match field {
            Field::Pnu => &mut self.pnu,
            Field::Symbol => &mut self.symbol,
            Field::Coordinates => &mut self.coordinates,
        }
    }
}

/// A member being read, with the depth its element opened at.
struct OpenMember {
    depth: usize,
    fields: RawFeatureMember,
    capture: Option<(Field, usize, String)>,
}

/// Parses a response body into parcel records.
///
/// # Errors
///
/// Returns [`GmlError`] if `body` is not well-formed XML.
pub fn parse(body: &[u8]) -> Result<Vec<ParcelRecord>, GmlError> {
    Ok(parse_document(body)?.records)
}

/// Parses a response body, also reporting how many feature members it
/// contained.
///
/// # Errors
///
/// Returns [`GmlError`] if `body` is not well-formed XML.
pub fn parse_document(body: &[u8]) -> Result<ParsedFeatures, GmlError> {
    let members = read_members(body)?;
    let member_count = members.len();

    let records = members
        .iter()
        .filter_map(|member| match extract_record(member) {
            Ok(Some(record)) => Some(record),
            Ok(None) => {
                log::debug!(
                    "Skipping feature member {} without geometry or category symbol",
                    member.pnu.as_deref().unwrap_or("<no pnu>")
                );
                None
            }
            Err(e) => {
                log::warn!(
                    "Dropping parcel {}: {e}",
                    member.pnu.as_deref().unwrap_or("<no pnu>")
                );
                None
            }
        })
        .collect();

    Ok(ParsedFeatures {
        member_count,
        records,
    })
}

/// Collects the raw fields of every `gml:featureMember` in document order.
///
/// # Errors
///
/// Returns [`GmlError`] if `body` is not well-formed XML.
pub fn read_members(body: &[u8]) -> Result<Vec<RawFeatureMember>, GmlError> {
    let mut reader = NsReader::from_reader(body);
    let mut buf = Vec::new();
    let mut depth = 0usize;
    let mut saw_root = false;
    let mut root_closed = false;
    let mut current: Option<OpenMember> = None;
    let mut members = Vec::new();

    loop {
        let (resolved, event) = match reader.read_resolved_event_into(&mut buf) {
            Ok(pair) => pair,
            Err(e) => {
                return Err(GmlError::Malformed {
                    message: e.to_string(),
                });
            }
        };

        match event {
            Event::Start(start) => {
                if root_closed {
                    return Err(content_after_root());
                }
                depth += 1;
                saw_root = true;
                let field = Field::resolve(bound_namespace(&resolved), start.local_name().as_ref());

                match current.as_mut() {
                    Some(member) => {
                        if let Some(field) = field.filter(|_| member.capture.is_none()) {
                            if member.fields.slot(field).is_none() {
                                member.capture = Some((field, depth, String::new()));
                            }
                        }
                    }
                    None => {
                        if is_feature_member(&resolved, start.local_name().as_ref()) {
                            current = Some(OpenMember {
                                depth,
                                fields: RawFeatureMember::default(),
                                capture: None,
                            });
                        }
                    }
                }
            }
            Event::Empty(start) => {
                if root_closed {
                    return Err(content_after_root());
                }
                if depth == 0 {
                    root_closed = true;
                }
                saw_root = true;
                let field = Field::resolve(bound_namespace(&resolved), start.local_name().as_ref());

                match current.as_mut() {
                    Some(member) => {
                        if let Some(field) = field.filter(|_| member.capture.is_none()) {
                            let slot = member.fields.slot(field);
                            if slot.is_none() {
                                *slot = Some(String::new());
                            }
                        }
                    }
                    None => {
                        if is_feature_member(&resolved, start.local_name().as_ref()) {
                            members.push(RawFeatureMember::default());
                        }
                    }
                }
            }
            Event::Text(text) => {
                if depth == 0 && !is_blank(&text) {
                    return Err(GmlError::Malformed {
                        message: "text outside the root element".to_string(),
                    });
                }
                if let Some((_, _, collected)) =
                    current.as_mut().and_then(|m| m.capture.as_mut())
                {
                    let text = text.unescape().map_err(|e| GmlError::Malformed {
                        message: e.to_string(),
                    })?;
                    collected.push_str(&text);
                }
            }
            Event::CData(data) => {
                if depth == 0 {
                    return Err(GmlError::Malformed {
                        message: "CDATA outside the root element".to_string(),
                    });
                }
                if let Some((_, _, collected)) =
                    current.as_mut().and_then(|m| m.capture.as_mut())
                {
                    collected.push_str(&String::from_utf8_lossy(&data));
                }
            }
            Event::End(_) => {
                if depth == 0 {
                    return Err(GmlError::Malformed {
                        message: "unmatched closing tag".to_string(),
                    });
                }

                if let Some(member) = current.as_mut() {
                    if member.capture.as_ref().is_some_and(|(_, d, _)| *d == depth) {
                        if let Some((field, _, collected)) = member.capture.take() {
                            *member.fields.slot(field) = Some(collected);
                        }
                    }
                }

                if current.as_ref().is_some_and(|m| m.depth == depth) {
                    if let Some(member) = current.take() {
                        members.push(member.fields);
                    }
                }

                depth -= 1;
                if depth == 0 {
                    root_closed = true;
                }
            }
            Event::Eof => break,
            _ => {}
        }

        buf.clear();
    }

    if depth != 0 {
        return Err(GmlError::Incomplete {
            message: format!("{depth} element(s) left unclosed"),
        });
    }
    if !saw_root {
        return Err(GmlError::Incomplete {
            message: "no root element".to_string(),
        });
    }

    Ok(members)
}

fn content_after_root() -> GmlError {
    GmlError::Malformed {
        message: "content after the root element".to_string(),
    }
}

/// Whitespace-only text, allowing a leading byte order mark.
fn is_blank(text: &[u8]) -> bool {
    text.strip_prefix(b"\xEF\xBB\xBF")
        .unwrap_or(text)
        .iter()
        .all(u8::is_ascii_whitespace)
}

fn is_feature_member(resolved: &ResolveResult<'_>, local: &[u8]) -> bool {
    bound_namespace(resolved) == GML_NS.as_bytes() && local == FEATURE_MEMBER
}

fn bound_namespace<'a>(resolved: &'a ResolveResult<'_>) -> &'a [u8] {
    match resolved {
        ResolveResult::Bound(Namespace(ns)) => *ns,
        ResolveResult::Unbound | ResolveResult::Unknown(_) => &[],
    }
}

/// Turns one member into a record, or decides to skip it.
///
/// Returns `Ok(None)` when the coordinates or the category symbol are
/// missing or blank. A missing `pnu` leaves the identifier empty.
///
/// # Errors
///
/// Returns [`GeometryError`] if the coordinates cannot be parsed or have
/// too few points to form a polygon.
pub fn extract_record(member: &RawFeatureMember) -> Result<Option<ParcelRecord>, GeometryError> {
    let Some(coordinates) = member.coordinates.as_deref() else {
        return Ok(None);
    };
    let Some(symbol) = member.symbol.as_deref().map(str::trim) else {
        return Ok(None);
    };
    let Some(category_code) = symbol.chars().last() else {
        return Ok(None);
    };

    let coords = parse_coordinates(coordinates)?;
    let polygon = polygon_from_coordinates(&coords)?;

    Ok(Some(ParcelRecord {
        id: member
            .pnu
            .as_deref()
            .map(str::trim)
            .unwrap_or_default()
            .to_string(),
        symbol: symbol.to_string(),
        category_code,
        polygon,
    }))
}

/// Parses GML 2 `coordinates` text (`"lon,lat lon,lat ..."`) in order.
///
/// Points are neither deduplicated nor closed.
///
/// # Errors
///
/// Returns [`GeometryError::InvalidCoordinate`] for a token that is not two
/// comma-separated numbers.
pub fn parse_coordinates(text: &str) -> Result<Vec<(f64, f64)>, GeometryError> {
    text.split_whitespace()
        .map(|token| {
            let invalid = || GeometryError::InvalidCoordinate {
                token: token.to_string(),
            };
            let (x, y) = token.split_once(',').ok_or_else(invalid)?;
            let x = x.parse::<f64>().map_err(|_| invalid())?;
            let y = y.parse::<f64>().map_err(|_| invalid())?;
            Ok((x, y))
        })
        .collect()
}
