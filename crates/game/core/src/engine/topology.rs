use std::fmt;

use crate::player::{PlayerId, PlayerRegistry};

/// A step in the compiled round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Node {
    Supervisor,
    Player(PlayerId),
    Aggregator,
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Supervisor => write!(f, "supervisor"),
            Node::Player(id) => write!(f, "player{}", id),
            Node::Aggregator => write!(f, "aggregator"),
        }
    }
}

/// The fixed supervisor → players → aggregator round, bound to a registry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Topology {
    nodes: Vec<Node>,
}

impl Topology {
    pub fn compile(registry: &PlayerRegistry) -> Self {
        let mut nodes = Vec::with_capacity(registry.len() + 2);
        nodes.push(Node::Supervisor);
        nodes.extend(registry.ids().map(Node::Player));
        nodes.push(Node::Aggregator);
        Self { nodes }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Player nodes in registry order.
    pub fn players(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.nodes.iter().filter_map(|node| match node {
            Node::Player(id) => Some(*id),
            _ => None,
        })
    }

    pub fn player_count(&self) -> usize {
        self.nodes.len() - 2
    }
}

impl fmt::Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let players: Vec<String> = self.players().map(|id| Node::Player(id).to_string()).collect();
        write!(f, "supervisor -> [{}] -> aggregator", players.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::player::{Player, PromptTemplate};

    #[test]
    fn compiles_one_node_per_player() {
        let template = Arc::new(PromptTemplate::new("{profile}").unwrap());
        let registry = PlayerRegistry::new(vec![
            Player::new(2, "", Arc::clone(&template)),
            Player::new(1, "", template),
        ])
        .unwrap();

        let topology = Topology::compile(&registry);
        assert_eq!(
            topology.nodes(),
            [
                Node::Supervisor,
                Node::Player(PlayerId(2)),
                Node::Player(PlayerId(1)),
                Node::Aggregator
            ]
        );
        assert_eq!(topology.player_count(), 2);
        assert_eq!(
            topology.to_string(),
            "supervisor -> [player2, player1] -> aggregator"
        );
    }
}
