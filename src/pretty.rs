/*!
 * Indented text outline of a source code tree, used for logging
 */

use std::cmp::Ordering;

use crate::types::Node;

const INDENT: &str = "   ";
const BRANCH: &str = "|- ";

/// Render the tree one node per line, directories first at every level
pub fn pretty_print(tree: &Node) -> String {
    let mut out = String::new();
    print_node(tree, 0, &mut out);
    out
}

fn print_node(node: &Node, level: usize, out: &mut String) {
    out.push_str(&INDENT.repeat(level));
    if level > 0 {
        out.push_str(BRANCH);
    }

    match node {
        Node::Directory(dir) => {
            out.push_str(&dir.path.to_string_lossy());
            out.push('\n');

            let mut children: Vec<&Node> = dir.children.iter().collect();
            children.sort_by(|a, b| outline_order(a, b));
            for child in children {
                print_node(child, level + 1, out);
            }
        }
        Node::File(file) => {
            out.push_str(&file.path.to_string_lossy());
            out.push('\n');
        }
        Node::Other(_) => out.push_str("Unknown\n"),
    }
}

/// Directories before everything else, then by path
fn outline_order(a: &Node, b: &Node) -> Ordering {
    b.is_dir()
        .cmp(&a.is_dir())
        .then_with(|| a.path().as_os_str().cmp(b.path().as_os_str()))
}
