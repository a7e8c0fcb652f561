//! In-memory model of a Tiled map document.
//!
//! The reader turns a `.tmx` file into a small element tree; everything the
//! standardization core needs (tileset declarations, csv tile grids, gid
//! objects) is reached through typed accessors on [`MapDocument`] so the core
//! never touches markup directly. Elements the exporter does not understand
//! are carried through untouched and written back verbatim.

use crate::error::{Error, Result};

pub const CELL_SIZE: u32 = 16;
pub const TALL_CELL_HEIGHT: u32 = 32;

pub const IMG_EXT: &str = ".png";
pub const MAP_EXT: &str = ".tmx";
pub const TILESET_EXT: &str = ".tsx";

/// Source-path component that marks a declaration as a standard map tileset.
/// Anything else (character sheets, templates) is removed on export.
pub const STANDARD_TILESET_DIR: &str = "tilesets";

/// Object collections whose gid attributes are remapped alongside the layers.
pub const REMAP_OBJECT_GROUPS: [&str; 2] = ["quests", "transitionSigns"];

/// Object collections whose gid is only an editor convenience; it is zeroed
/// after the remap pass so no stale identifier leaks into the export.
pub const ZERO_OBJECT_GROUPS: [&str; 2] = ["characters", "lightSpace"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Element {
            name: name.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Replaces the attribute in place, preserving its position, or appends.
    pub fn set_attr(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attrs.iter_mut().find(|(k, _)| k == key) {
            Some(slot) => slot.1 = value,
            None => self.attrs.push((key.to_string(), value)),
        }
    }

    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|n| match n {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        })
    }

    pub fn child_elements_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.children.iter_mut().filter_map(|n| match n {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        })
    }

    pub fn text(&self) -> Option<&str> {
        self.children.iter().find_map(|n| match n {
            Node::Text(t) => Some(t.as_str()),
            Node::Element(_) => None,
        })
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.children.retain(|n| !matches!(n, Node::Text(_)));
        self.children.push(Node::Text(text.into()));
    }
}

/// One `<tileset>` declaration as recorded by a specific map file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TilesetDecl {
    pub name: String,
    pub first_gid: u32,
    pub source: String,
}

impl TilesetDecl {
    pub fn from_element(el: &Element) -> Result<Self> {
        let source = el
            .attr("source")
            .ok_or_else(|| Error::map("tileset declaration without source"))?
            .to_string();
        let first_gid = el
            .attr("firstgid")
            .and_then(|v| v.parse().ok())
            .ok_or_else(|| Error::map(format!("tileset '{source}' has no valid firstgid")))?;
        Ok(TilesetDecl {
            name: source_stem(&source).to_string(),
            first_gid,
            source,
        })
    }

    pub fn is_standard(&self) -> bool {
        is_standard_source(&self.source)
    }
}

/// Whether a declaration's source lives under the shared tileset directory.
pub fn is_standard_source(source: &str) -> bool {
    source
        .split(['/', '\\'])
        .any(|part| part == STANDARD_TILESET_DIR)
}

/// File stem of a tileset source path; the stem is the tileset's name.
pub fn source_stem(source: &str) -> &str {
    let file = source.rsplit(['/', '\\']).next().unwrap_or(source);
    file.strip_suffix(TILESET_EXT).unwrap_or(file)
}

/// A csv layer grid of packed tile codes.
pub type Grid = Vec<Vec<u32>>;

/// A parsed map document. Layer names are assumed unique per map, which is
/// how the editor project is organised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapDocument {
    pub root: Element,
}

impl MapDocument {
    /// Tileset declarations in file order.
    pub fn tileset_decls(&self) -> Result<Vec<TilesetDecl>> {
        self.root
            .child_elements()
            .filter(|e| e.name == "tileset")
            .map(TilesetDecl::from_element)
            .collect()
    }

    /// Drops every tileset declaration that fails `keep`.
    pub fn retain_tilesets(&mut self, keep: impl Fn(&Element) -> bool) {
        self.root.children.retain(|n| match n {
            Node::Element(e) if e.name == "tileset" => keep(e),
            _ => true,
        });
    }

    /// Rewrites the declaration for `name` with a new firstgid and source.
    pub fn update_tileset_decl(&mut self, name: &str, first_gid: u32, source: String) {
        for el in self
            .root
            .child_elements_mut()
            .filter(|e| e.name == "tileset")
        {
            let hit = el.attr("source").is_some_and(|s| source_stem(s) == name);
            if hit {
                el.set_attr("firstgid", first_gid.to_string());
                el.set_attr("source", source);
                return;
            }
        }
    }

    /// Reorders the declarations ascending by firstgid, keeping their slot
    /// among the other map children.
    pub fn sort_tileset_decls(&mut self) {
        let Some(first_idx) = self
            .root
            .children
            .iter()
            .position(|n| matches!(n, Node::Element(e) if e.name == "tileset"))
        else {
            return;
        };

        let mut decls: Vec<Element> = Vec::new();
        let mut rest: Vec<Node> = Vec::new();
        for node in self.root.children.drain(..) {
            match node {
                Node::Element(e) if e.name == "tileset" => decls.push(e),
                other => rest.push(other),
            }
        }
        decls.sort_by_key(|e| {
            e.attr("firstgid")
                .and_then(|v| v.parse::<u32>().ok())
                .unwrap_or(u32::MAX)
        });

        let at = first_idx.min(rest.len());
        rest.splice(at..at, decls.into_iter().map(Node::Element));
        self.root.children = rest;
    }

    /// Every csv-encoded tile layer (grouped or not) as (name, grid).
    pub fn csv_layers(&self) -> Vec<(String, Grid)> {
        let mut out = Vec::new();
        collect_csv_layers(&self.root, &mut out);
        out
    }

    /// Writes a grid back into the named layer's data element.
    /// Returns false when the layer does not exist.
    pub fn set_csv_layer(&mut self, layer_name: &str, grid: &Grid) -> bool {
        set_csv_layer_in(&mut self.root, layer_name, grid)
    }

    /// The (object id, tile code) pairs of every gid-bearing object in the
    /// named collection.
    pub fn gid_objects(&self, group: &str) -> Result<Vec<(u32, u32)>> {
        let mut out = Vec::new();
        collect_gid_objects(&self.root, group, &mut out)?;
        Ok(out)
    }

    pub fn set_object_gid(&mut self, group: &str, object_id: u32, code: u32) -> bool {
        set_object_gid_in(&mut self.root, group, object_id, code)
    }

    /// Zeroes the gid of every object in the named collection; returns how
    /// many were touched.
    pub fn zero_object_gids(&mut self, group: &str) -> usize {
        zero_object_gids_in(&mut self.root, group)
    }
}

fn collect_csv_layers(el: &Element, out: &mut Vec<(String, Grid)>) {
    for child in el.child_elements() {
        if child.name == "layer" {
            if let (Some(name), Some(data)) = (child.attr("name"), csv_data(child)) {
                out.push((name.to_string(), parse_csv(data)));
            }
        } else if child.name == "group" {
            collect_csv_layers(child, out);
        }
    }
}

fn csv_data(layer: &Element) -> Option<&str> {
    layer
        .child_elements()
        .find(|d| d.name == "data" && d.attr("encoding") == Some("csv"))
        .and_then(Element::text)
}

fn set_csv_layer_in(el: &mut Element, layer_name: &str, grid: &Grid) -> bool {
    for child in el.child_elements_mut() {
        let hit = child.name == "layer" && child.attr("name") == Some(layer_name);
        if hit {
            for data in child.child_elements_mut() {
                if data.name == "data" && data.attr("encoding") == Some("csv") {
                    data.set_text(format_csv(grid));
                    return true;
                }
            }
        } else if child.name == "group" && set_csv_layer_in(child, layer_name, grid) {
            return true;
        }
    }
    false
}

fn collect_gid_objects(el: &Element, group: &str, out: &mut Vec<(u32, u32)>) -> Result<()> {
    for child in el.child_elements() {
        if child.name == "objectgroup" && child.attr("name") == Some(group) {
            for obj in child.child_elements().filter(|o| o.name == "object") {
                let Some(gid) = obj.attr("gid") else { continue };
                let code: u32 = gid.parse().map_err(|_| {
                    Error::map(format!(
                        "object in group '{group}' has non-numeric gid '{gid}'"
                    ))
                })?;
                let id: u32 = obj
                    .attr("id")
                    .and_then(|v| v.parse().ok())
                    .ok_or_else(|| Error::map(format!("object in group '{group}' has no id")))?;
                out.push((id, code));
            }
        } else if child.name == "group" {
            collect_gid_objects(child, group, out)?;
        }
    }
    Ok(())
}

fn set_object_gid_in(el: &mut Element, group: &str, object_id: u32, code: u32) -> bool {
    for child in el.child_elements_mut() {
        let hit = child.name == "objectgroup" && child.attr("name") == Some(group);
        if hit {
            for obj in child.child_elements_mut().filter(|o| o.name == "object") {
                if obj.attr("id") == Some(object_id.to_string().as_str()) {
                    obj.set_attr("gid", code.to_string());
                    return true;
                }
            }
        } else if child.name == "group" && set_object_gid_in(child, group, object_id, code) {
            return true;
        }
    }
    false
}

fn zero_object_gids_in(el: &mut Element, group: &str) -> usize {
    let mut count = 0;
    for child in el.child_elements_mut() {
        let hit = child.name == "objectgroup" && child.attr("name") == Some(group);
        if hit {
            for obj in child.child_elements_mut().filter(|o| o.name == "object") {
                if obj.attr("gid").is_some() {
                    obj.set_attr("gid", "0");
                    count += 1;
                }
            }
        } else if child.name == "group" {
            count += zero_object_gids_in(child, group);
        }
    }
    count
}

/// Decodes Tiled's csv cell text. Blank cells (trailing commas) are dropped,
/// matching how the editor itself writes rows.
pub fn parse_csv(text: &str) -> Grid {
    text.lines()
        .filter_map(|line| {
            let row: Vec<u32> = line
                .split(',')
                .filter_map(|c| c.trim().parse().ok())
                .collect();
            if row.is_empty() { None } else { Some(row) }
        })
        .collect()
}

/// Encodes a grid back into Tiled's csv convention: leading newline, one row
/// per line, every row but the last with a trailing comma.
pub fn format_csv(grid: &Grid) -> String {
    let mut out = String::from("\n");
    for (i, row) in grid.iter().enumerate() {
        let line = row
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(",");
        out.push_str(&line);
        if i + 1 < grid.len() {
            out.push(',');
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_stem_and_category() {
        assert_eq!(source_stem("../tilesets/terrain.tsx"), "terrain");
        assert_eq!(source_stem("buildings.tsx"), "buildings");
        assert!(is_standard_source("../tilesets/terrain.tsx"));
        assert!(!is_standard_source("../characters/villager.tsx"));
    }

    #[test]
    fn test_csv_round_trip() {
        let text = "\n1,2,3,\n0,2147483678,5\n";
        let grid = parse_csv(text);
        assert_eq!(grid, vec![vec![1, 2, 3], vec![0, 2147483678, 5]]);
        assert_eq!(format_csv(&grid), text);
    }

    #[test]
    fn test_csv_ignores_blank_lines() {
        let grid = parse_csv("\n1,2,\n\n3,4\n");
        assert_eq!(grid, vec![vec![1, 2], vec![3, 4]]);
    }

    #[test]
    fn test_sort_tileset_decls_keeps_slot() {
        let mut map = Element::new("map");
        let mut a = Element::new("tileset");
        a.set_attr("firstgid", "101");
        a.set_attr("source", "tilesets/b.tsx");
        let mut b = Element::new("tileset");
        b.set_attr("firstgid", "1");
        b.set_attr("source", "tilesets/a.tsx");
        map.children.push(Node::Element(a));
        map.children.push(Node::Element(b));
        map.children.push(Node::Element(Element::new("group")));

        let mut doc = MapDocument { root: map };
        doc.sort_tileset_decls();

        let decls = doc.tileset_decls().unwrap();
        assert_eq!(decls[0].first_gid, 1);
        assert_eq!(decls[1].first_gid, 101);
        // the group stays behind the declarations
        assert_eq!(doc.root.child_elements().last().unwrap().name, "group");
    }
}
