use seag_rom::parse;
use seag_romtools::NodeSummary;

fn image() -> Vec<u8> {
    // old container: one directory with a packed file, then spare space
    let mut image: Vec<u8> = (0..16).collect();
    image.extend([0x01, 0x18, 0x00, 0x00, 0x00, 0x2c, 0x00, 0x00]);
    image.extend([0x03, 0x30, 0x00, 0x00, 0x00, 0x00, 0x10, 0x00]);
    image.extend(*b"CPRS\x00\x00\x00\x00\x00\x00\x00\x00");
    image.extend([0xff; 6]);
    image
}

#[test]
fn summary_mirrors_the_tree() {
    let root = parse(&image()).unwrap();
    let summary = NodeSummary::from_element(&root);

    assert_eq!(summary.kind, "OldContainer");
    assert_eq!(summary.id, 0x1d);
    assert_eq!(summary.size, image().len());
    assert_eq!(summary.children.len(), 2);

    let file = summary.children[0].children[0].file.as_ref().unwrap();
    assert!(file.packed);
    assert_eq!(file.slot, 1);
    assert_eq!(file.load_address, 0x0010_0000);
    assert_eq!(file.payload_len, 12);
}

#[test]
fn json_uses_stable_field_names() {
    let root = parse(&image()).unwrap();
    let json = NodeSummary::from_element(&root).to_json().unwrap();
    let file = &json["children"][0]["children"][0];
    assert_eq!(file["kind"], "File");
    assert_eq!(file["type"], 0);
    assert_eq!(file["load_address"], 0x0010_0000);
    assert!(json["children"][1].get("children").is_none());
}
