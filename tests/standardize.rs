use std::fs;

use tmx_standardizer::model::MapDocument;
use tmx_standardizer::parser;
use tmx_standardizer::processor::catalog::{Catalog, Tileset};
use tmx_standardizer::processor::hierarchy::{self, CanonicalRanges};
use tmx_standardizer::processor::{UnresolvedPolicy, standardize};
use tmx_standardizer::writer;

const FLIP_H: u32 = 0x8000_0000;

/// terrain: priority 1, 100 cells; buildings: priority 2, 50 cells.
/// Canonical: terrain [1,101), buildings [101,151).
fn scenario_catalog() -> (Catalog, CanonicalRanges) {
    let mut catalog = Catalog::default();
    catalog.insert(Tileset {
        name: "terrain".into(),
        priority: 1,
        cell_count: 100,
    });
    catalog.insert(Tileset {
        name: "buildings".into(),
        priority: 2,
        cell_count: 50,
    });
    let canonical = hierarchy::canonical_ranges(&catalog);
    (catalog, canonical)
}

fn fixture() -> MapDocument {
    let xml = fs::read_to_string("tests/forest_edge.tmx").unwrap();
    parser::parse(&xml).expect("valid fixture")
}

#[test]
fn standardizes_the_fixture_map() {
    let (catalog, canonical) = scenario_catalog();
    let mut doc = fixture();

    // the map declares buildings first at 1 ([1,51)) and terrain at 51
    // ([51,151)), the reverse of the canonical layout
    let report = standardize(&mut doc, &catalog, &canonical, UnresolvedPolicy::Abort).unwrap();

    let layers = doc.csv_layers();
    assert_eq!(layers.len(), 1);
    assert_eq!(
        layers[0].1,
        vec![
            // 70 (current terrain) -> 20; 30 (current buildings) -> 130;
            // empty stays; flipped 30 keeps the flag
            vec![20, 130, 0, 130 | FLIP_H],
            vec![1, 100, 101, 150],
        ]
    );

    // quest object 60 sits in the current terrain range
    assert_eq!(doc.gid_objects("quests").unwrap(), vec![(6, 10)]);

    // transient references are zeroed, not remapped
    assert_eq!(doc.gid_objects("characters").unwrap(), vec![(4, 0)]);
    assert_eq!(doc.gid_objects("lightSpace").unwrap(), vec![(9, 0)]);

    // declarations: character tileset gone, rest canonical and ascending
    let decls = doc.tileset_decls().unwrap();
    assert_eq!(decls.len(), 2);
    assert_eq!(decls[0].name, "terrain");
    assert_eq!(decls[0].first_gid, 1);
    assert_eq!(decls[0].source, "tilesets/terrain.tsx");
    assert_eq!(decls[1].name, "buildings");
    assert_eq!(decls[1].first_gid, 101);
    assert_eq!(decls[1].source, "tilesets/buildings.tsx");

    // 7 cells + 1 quest object changed; 2 transient gids zeroed
    assert_eq!(report.remapped, 8);
    assert_eq!(report.skipped, 0);
    assert_eq!(report.zeroed, 2);
}

#[test]
fn standardizing_twice_is_a_no_op() {
    let (catalog, canonical) = scenario_catalog();
    let mut doc = fixture();
    standardize(&mut doc, &catalog, &canonical, UnresolvedPolicy::Abort).unwrap();

    let before = writer::to_tmx(&doc).unwrap();
    let report = standardize(&mut doc, &catalog, &canonical, UnresolvedPolicy::Abort).unwrap();
    let after = writer::to_tmx(&doc).unwrap();

    assert_eq!(report.remapped, 0, "canonical map must produce no edits");
    assert_eq!(before, after);
}

#[test]
fn result_is_independent_of_layer_order() {
    let (catalog, canonical) = scenario_catalog();

    let make = |layers_swapped: bool| {
        let (a, b) = (
            "<layer name=\"ground\"><data encoding=\"csv\">\n70,30\n</data></layer>",
            "<layer name=\"deco\"><data encoding=\"csv\">\n51,1\n</data></layer>",
        );
        let (first, second) = if layers_swapped { (b, a) } else { (a, b) };
        let xml = format!(
            "<map width=\"2\" height=\"1\">\
             <tileset firstgid=\"1\" source=\"tilesets/buildings.tsx\"/>\
             <tileset firstgid=\"51\" source=\"tilesets/terrain.tsx\"/>\
             <group name=\"zed\">{first}{second}</group></map>"
        );
        let mut doc = parser::parse(&xml).unwrap();
        standardize(&mut doc, &catalog, &canonical, UnresolvedPolicy::Abort).unwrap();
        let mut layers = doc.csv_layers();
        layers.sort();
        layers
    };

    assert_eq!(make(false), make(true));
}

#[test]
fn unresolved_code_aborts_with_location() {
    let (catalog, canonical) = scenario_catalog();
    let xml = "<map width=\"2\" height=\"1\">\
               <tileset firstgid=\"1\" source=\"tilesets/buildings.tsx\"/>\
               <tileset firstgid=\"51\" source=\"tilesets/terrain.tsx\"/>\
               <layer name=\"ground\"><data encoding=\"csv\">\n70,500\n</data></layer></map>";
    let mut doc = parser::parse(xml).unwrap();

    let err = standardize(&mut doc, &catalog, &canonical, UnresolvedPolicy::Abort).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("500"), "message was: {msg}");
    assert!(msg.contains("ground"), "message was: {msg}");

    // abort means nothing was committed
    assert_eq!(doc.csv_layers()[0].1, vec![vec![70, 500]]);
}

#[test]
fn unresolved_code_can_be_skipped() {
    let (catalog, canonical) = scenario_catalog();
    let xml = "<map width=\"2\" height=\"1\">\
               <tileset firstgid=\"1\" source=\"tilesets/buildings.tsx\"/>\
               <tileset firstgid=\"51\" source=\"tilesets/terrain.tsx\"/>\
               <layer name=\"ground\"><data encoding=\"csv\">\n70,500\n</data></layer></map>";
    let mut doc = parser::parse(xml).unwrap();

    let report = standardize(&mut doc, &catalog, &canonical, UnresolvedPolicy::Skip).unwrap();
    assert_eq!(report.skipped, 1);
    assert_eq!(report.remapped, 1);
    assert_eq!(doc.csv_layers()[0].1, vec![vec![20, 500]]);
}

#[test]
fn unknown_tileset_declaration_fails_the_map() {
    let (catalog, canonical) = scenario_catalog();
    let xml = "<map width=\"1\" height=\"1\">\
               <tileset firstgid=\"1\" source=\"tilesets/swamp.tsx\"/>\
               <layer name=\"ground\"><data encoding=\"csv\">\n1\n</data></layer></map>";
    let mut doc = parser::parse(xml).unwrap();

    let err = standardize(&mut doc, &catalog, &canonical, UnresolvedPolicy::Abort).unwrap_err();
    assert!(err.to_string().contains("swamp"));
}
