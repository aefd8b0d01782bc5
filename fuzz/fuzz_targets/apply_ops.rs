#![no_main]

use libfuzzer_sys::fuzz_target;
use md_blocks::edit::{self, InsertKind};
use md_blocks::{Config, EditOp, MarkerStyle, check_list_depths, parse, serialize};

const SEED: &str = "# Title\n\n- [ ] a\n  - b\n    - c\n- d\n\n1. one\n2. two\n\nText";

fuzz_target!(|data: &[u8]| {
    let config = Config::default();
    let mut blocks = parse(SEED);

    for chunk in data.chunks(3) {
        if chunk.len() < 3 || blocks.is_empty() {
            break;
        }
        let id = blocks[chunk[1] as usize % blocks.len()].id;
        let other = blocks[chunk[2] as usize % blocks.len()].id;
        let op = match chunk[0] % 8 {
            0 => EditOp::InsertAfter {
                anchor: id,
                kind: InsertKind::ListItemSibling.keyword().into(),
                marker_style: None,
            },
            1 => EditOp::InsertAfter {
                anchor: id,
                kind: InsertKind::ListItemChild.keyword().into(),
                marker_style: Some(MarkerStyle::LowerRoman),
            },
            2 => EditOp::Indent { id },
            3 => EditOp::Outdent { id },
            4 => EditOp::ToggleChecked { id },
            5 => EditOp::ReplaceContent {
                id,
                text: "- [x] typed".into(),
            },
            6 => EditOp::Reorder {
                source: id,
                target: other,
            },
            _ => EditOp::Delete { id },
        };
        // Reorder, delete and paragraph re-parse may leave orphans; the rest must not.
        let keeps_depths = matches!(
            op,
            EditOp::Indent { .. } | EditOp::Outdent { .. } | EditOp::ToggleChecked { .. }
        );
        let valid_before = check_list_depths(&blocks).is_ok();
        blocks = edit::apply(&blocks, &op, &config);
        if keeps_depths && valid_before {
            assert!(check_list_depths(&blocks).is_ok());
        }
    }

    let _ = serialize(&blocks);
});
