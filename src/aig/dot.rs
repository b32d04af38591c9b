//! You can also export AIGs and miters to the Graphviz dot format using their `to_dot` methods: [`Aig::to_dot`], [`Miter::to_dot`].
//!
//! ```rust
//! use carrycheck::{
//!     adder::{CarryLookahead, RippleCarry},
//!     bitvec::Width,
//!     dot::GraphvizStyle,
//!     miter::Miter,
//! };
//!
//! let miter = Miter::new(Width::new(2).unwrap(), &RippleCarry, &CarryLookahead).unwrap();
//! let dot = miter.to_dot(&GraphvizStyle::default());
//! assert!(dot.starts_with("strict digraph {"));
//! ```
//!
//! You can then render the graphs using the DOT engine.

use std::{fmt::Display, ops::Add};

use crate::{Aig, AigEdge, AigNode, dfs::Dfs, miter::Miter};

// Definining default global style.
const DEFAULT_RANKDIR: &str = "BT";
const DEFAULT_MITER_OUTPUT_LABEL: &str = "differ";

// Defining default style for nodes.
const DEFAULT_FALSE_NODE_FORMAT: &str = "[shape=point, label=\"GND\", width=1.5]";
const DEFAULT_INPUT_NODE_FORMAT: &str = "[shape=box]";
const DEFAULT_AND_NODE_FORMAT: &str = "[shape=circle]";
/// See https://stackoverflow.com/questions/50822798/how-to-use-graphviz-to-draw-a-node-pointed-by-an-arrow.
const DEFAULT_OUTPUT_NODE_FORMAT: &str = "[shape=none, height=.0, width=.0]";

// Defining default style for edges.
const DEFAULT_EDGE_ALL_FORMAT: &str = "[arrowsize=0.3]";
const DEFAULT_EDGE_COMPLEMENT_FORMAT: &str = "[headlabel=\"●\", labelangle=.0, labeldistance=1.5]";
const DEFAULT_EDGE_OUTPUT_FORMAT: &str = "[arrowhead=none]";

/// String containing the graphviz node style (you must manually include square brackets).
#[derive(Debug, Clone)]
pub struct GraphvizNodeStyle(String);

impl Display for GraphvizNodeStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// String containing the graphviz edge style (you must manually include square brackets).
#[derive(Debug, Clone, Default)]
pub struct GraphvizEdgeStyle(String);

impl Display for GraphvizEdgeStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Add for GraphvizEdgeStyle {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        GraphvizEdgeStyle(format!("{}{}", self.0, rhs.0))
    }
}

/// Parameters for Graphviz rendering.
///
/// ### Global parameters
/// - `rankdir`
/// - the label of the miter output.
///
/// ### Nodes
/// [`AigNode::False`], [`AigNode::Input`], [`AigNode::And`] and outputs (by default,
/// invisible nodes just to get an arrow) each have a [`GraphvizNodeStyle`].
///
/// ### Edges
/// Edge styles are additive. All edges implement the `edge_all` style. To that can be added:
/// - `edge_complement` if the edge is complemented
/// - `edge_output` if the edge is directed to an output.
#[derive(Debug, Clone)]
pub struct GraphvizStyle {
    // Global
    rankdir: String,
    miter_output_label: String,

    // Nodes
    cst_false: GraphvizNodeStyle,
    input: GraphvizNodeStyle,
    and: GraphvizNodeStyle,
    output: GraphvizNodeStyle,

    // Edges
    edge_all: GraphvizEdgeStyle,
    edge_complement: GraphvizEdgeStyle,
    edge_output: GraphvizEdgeStyle,
}

impl Default for GraphvizStyle {
    fn default() -> Self {
        GraphvizStyle {
            rankdir: DEFAULT_RANKDIR.to_string(),
            miter_output_label: DEFAULT_MITER_OUTPUT_LABEL.to_string(),

            cst_false: GraphvizNodeStyle(DEFAULT_FALSE_NODE_FORMAT.to_string()),
            input: GraphvizNodeStyle(DEFAULT_INPUT_NODE_FORMAT.to_string()),
            and: GraphvizNodeStyle(DEFAULT_AND_NODE_FORMAT.to_string()),
            output: GraphvizNodeStyle(DEFAULT_OUTPUT_NODE_FORMAT.to_string()),

            edge_all: GraphvizEdgeStyle(DEFAULT_EDGE_ALL_FORMAT.to_string()),
            edge_complement: GraphvizEdgeStyle(DEFAULT_EDGE_COMPLEMENT_FORMAT.to_string()),
            edge_output: GraphvizEdgeStyle(DEFAULT_EDGE_OUTPUT_FORMAT.to_string()),
        }
    }
}

impl GraphvizStyle {
    pub fn with_rankdir(mut self, rankdir: impl Into<String>) -> Self {
        self.rankdir = rankdir.into();
        self
    }
}

impl AigNode {
    fn get_graphviz_id(&self) -> String {
        format!("n{}", self.get_id())
    }

    /// Beware, [`AigNode::False`] is a special case.
    fn graphviz_decl(&self, aig: &Aig) -> String {
        let graphviz_id = self.get_graphviz_id();

        let label = match self {
            AigNode::False => return graphviz_id, // early return, we don't '\n' because style is defined later
            AigNode::Input(id) => aig
                .get_input_name(*id)
                .map(str::to_string)
                .unwrap_or_else(|| format!("i{}", id)),
            AigNode::And { .. } => "".to_string(),
        };
        format!("{} [label=\"{}\"]\n", graphviz_id, label)
    }
}

impl AigEdge {
    fn graphviz_decl(&self, to: &str, to_output: bool, graphviz_style: &GraphvizStyle) -> String {
        let mut style = GraphvizEdgeStyle::default();
        if self.complement {
            style = style + graphviz_style.edge_complement.clone();
        }
        if to_output {
            style = style + graphviz_style.edge_output.clone();
        }
        format!("n{} -> {} {}\n", self.node, to, style)
    }
}

impl Aig {
    /// Returns a DOT representation of the cone of the given named outputs.
    pub fn to_dot(&self, outputs: &[(String, AigEdge)], graphviz_style: &GraphvizStyle) -> String {
        let mut decl_edges = String::new();

        // Creating different subgraphs for node declarations
        let mut decl_false_node_optional = "".to_string();
        let mut decl_inputs = format!("subgraph inputs {{\n node {}\n", graphviz_style.input);
        let mut decl_outputs = format!("subgraph outputs {{\n node {}\n", graphviz_style.output);
        let mut decl_ands = format!("subgraph ands {{\n node {}\n", graphviz_style.and);

        // Adding artificial outputs to point to
        for (i, (name, output)) in outputs.iter().enumerate() {
            let output_id = format!("o{}", i);
            decl_outputs.push_str(&format!("{} [label=\"{}\"]\n", output_id, name));
            decl_edges.push_str(&output.graphviz_decl(&output_id, true, graphviz_style));
        }

        // DFS from outputs
        let edges: Vec<AigEdge> = outputs.iter().map(|(_, edge)| *edge).collect();
        let mut dfs = Dfs::from_edges(&edges);
        while let Some(node) = dfs.next(self) {
            match node {
                AigNode::False => decl_false_node_optional.push_str(&format!(
                    "{} {}\n",
                    node.graphviz_decl(self),
                    graphviz_style.cst_false
                )),
                AigNode::Input(_) => decl_inputs.push_str(&node.graphviz_decl(self)),
                AigNode::And { .. } => decl_ands.push_str(&node.graphviz_decl(self)),
            }
            for fanin in node.get_fanins() {
                decl_edges.push_str(&fanin.graphviz_decl(
                    &node.get_graphviz_id(),
                    false,
                    graphviz_style,
                ));
            }
        }

        // Concatenating everything together
        format!(
            "strict digraph {{
    rankdir=\"{}\"
    edge {}
    {}
    {}
    }}
    {}
    }}
    {}
    }}
    {}
}}
",
            graphviz_style.rankdir,
            graphviz_style.edge_all,
            decl_false_node_optional,
            decl_inputs,
            decl_ands,
            decl_outputs,
            decl_edges
        )
    }
}

impl Miter {
    /// Returns a DOT representation of the miter: the output bits of both circuits,
    /// and the signal which is true iff they differ.
    pub fn to_dot(&self, graphviz_style: &GraphvizStyle) -> String {
        let mut outputs: Vec<(String, AigEdge)> = self
            .outputs()
            .iter()
            .flat_map(|(name, out)| {
                out.bits()
                    .iter()
                    .enumerate()
                    .map(move |(i, bit)| (format!("{}[{}]", name, i), *bit))
            })
            .collect();
        outputs.push((graphviz_style.miter_output_label.clone(), self.differ()));
        self.aig().to_dot(&outputs, graphviz_style)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        adder::{CarryLookahead, RippleCarry, half_adder},
        bitvec::{BitVec, Width},
    };

    #[test]
    fn half_adder_to_dot() {
        let mut aig = Aig::new();
        let a = BitVec::input(&mut aig, "a", Width::new(1).unwrap());
        let b = BitVec::input(&mut aig, "b", Width::new(1).unwrap());
        let (sum, carry) = half_adder(&mut aig, &a, &b).unwrap();
        let outputs = [
            ("sum".to_string(), sum.as_bit().unwrap()),
            ("carry".to_string(), carry.as_bit().unwrap()),
        ];
        let dot = aig.to_dot(&outputs, &GraphvizStyle::default());

        assert!(dot.starts_with("strict digraph {\n    rankdir=\"BT\""));
        assert!(dot.contains("n1 [label=\"a[0]\"]"));
        assert!(dot.contains("n2 [label=\"b[0]\"]"));
        assert!(dot.contains("o0 [label=\"sum\"]"));
        assert!(dot.contains("o1 [label=\"carry\"]"));
        // carry = a AND b, pointed at directly
        assert!(dot.contains(&format!(
            "n{} -> o1 {}",
            carry.as_bit().unwrap().get_node_id(),
            DEFAULT_EDGE_OUTPUT_FORMAT
        )));
        // Every and gate of the AIG is in the cone of the outputs
        assert_eq!(dot.matches("[label=\"\"]").count(), aig.and_count());
    }

    #[test]
    fn constant_output_to_dot() {
        let aig = Aig::new();
        let dot = aig.to_dot(
            &[("one".to_string(), AigEdge::TRUE)],
            &GraphvizStyle::default().with_rankdir("LR"),
        );
        assert!(dot.contains("rankdir=\"LR\""));
        assert!(dot.contains(&format!("n0 {}", DEFAULT_FALSE_NODE_FORMAT)));
        assert!(dot.contains(&format!("n0 -> o0 {}", DEFAULT_EDGE_COMPLEMENT_FORMAT)));
    }

    #[test]
    fn adders_miter_to_dot() {
        let miter = Miter::new(Width::new(2).unwrap(), &RippleCarry, &CarryLookahead).unwrap();
        let dot = miter.to_dot(&GraphvizStyle::default());
        for label in ["ripple[0]", "ripple[1]", "lookahead[1]", "differ", "X[1]", "Y[0]"] {
            assert!(dot.contains(&format!("[label=\"{}\"]", label)), "{}", label);
        }
    }
}
