//! `ParisSample`: twelve Paris attractions chained into a single OR path
//! with one branch at the Louvre.
//!
//! ```text
//! Eiffel Tower → Louvre Museum ─┬→ Seine River Boat Ride
//!                               └→ Notre Dame Cathedral → Champs-Élysées
//!   → Montmartre → Sacré-Cœur Basilica → Palace of Versailles
//!   → Luxembourg Gardens → Disneyland Paris → Centre Pompidou → Musée d'Orsay
//! ```
//!
//! Costs are hours, currency units and a 0–10 desirability score.

use trailhead_kernel::graph::{ActivityGraph, GraphError, NodeSpec, Relation};

use crate::contract::{GraphWorld, WorldGraph};

pub const EIFFEL_TOWER: &str = "Eiffel Tower";
pub const LOUVRE: &str = "Louvre Museum";
pub const BOAT_RIDE: &str = "Seine River Boat Ride";
pub const NOTRE_DAME: &str = "Notre Dame Cathedral";
pub const CHAMPS_ELYSEES: &str = "Champs-Élysées";
pub const MONTMARTRE: &str = "Montmartre";
pub const SACRE_COEUR: &str = "Sacré-Cœur Basilica";
pub const VERSAILLES: &str = "Palace of Versailles";
pub const LUXEMBOURG: &str = "Luxembourg Gardens";
pub const DISNEYLAND: &str = "Disneyland Paris";
pub const POMPIDOU: &str = "Centre Pompidou";
pub const ORSAY: &str = "Musée d'Orsay";

/// `(name, hours, cost, score, description, location)`.
type Attraction = (&'static str, f64, f64, f64, &'static str, &'static str);

const ATTRACTIONS: [Attraction; 12] = [
    (
        EIFFEL_TOWER,
        2.0,
        30.0,
        10.0,
        "Iconic wrought-iron lattice tower.",
        "Champ de Mars, Paris",
    ),
    (
        LOUVRE,
        3.0,
        25.0,
        9.0,
        "World-famous museum with vast art collections.",
        "Rue de Rivoli, Paris",
    ),
    (
        BOAT_RIDE,
        1.0,
        15.0,
        7.0,
        "Enjoy a scenic boat ride on the Seine River.",
        "Seine River, Paris",
    ),
    (
        NOTRE_DAME,
        2.0,
        0.0,
        8.0,
        "Historic Catholic cathedral with Gothic architecture.",
        "Île de la Cité, Paris",
    ),
    (
        CHAMPS_ELYSEES,
        1.0,
        10.0,
        6.0,
        "Famous avenue with shops, cafes, and theaters.",
        "Champs-Élysées, Paris",
    ),
    (
        MONTMARTRE,
        3.0,
        20.0,
        8.0,
        "Historic district with Sacré-Cœur Basilica and artistic vibe.",
        "Montmartre, Paris",
    ),
    (
        SACRE_COEUR,
        1.5,
        5.0,
        7.0,
        "White-domed basilica with panoramic views of the city.",
        "Montmartre, Paris",
    ),
    (
        VERSAILLES,
        4.0,
        40.0,
        10.0,
        "Opulent palace and gardens of the French monarchy.",
        "Versailles, France",
    ),
    (
        LUXEMBOURG,
        2.0,
        5.0,
        6.0,
        "Beautiful gardens with fountains, statues, and a palace.",
        "Luxembourg Gardens, Paris",
    ),
    (
        DISNEYLAND,
        6.0,
        60.0,
        9.0,
        "Disney theme park with rides, shows, and characters.",
        "Marne-la-Vallée, France",
    ),
    (
        POMPIDOU,
        2.0,
        15.0,
        6.0,
        "Modern art museum with a distinctive industrial design.",
        "Beaubourg, Paris",
    ),
    (
        ORSAY,
        3.0,
        20.0,
        9.0,
        "Museum housing French art from the 19th and early 20th centuries.",
        "Rue de la Légion d'Honneur, Paris",
    ),
];

/// Edge insertion order matters: it is the final frontier tie-break.
const LINKS: [(&str, &str); 11] = [
    (EIFFEL_TOWER, LOUVRE),
    (LOUVRE, BOAT_RIDE),
    (LOUVRE, NOTRE_DAME),
    (NOTRE_DAME, CHAMPS_ELYSEES),
    (CHAMPS_ELYSEES, MONTMARTRE),
    (MONTMARTRE, SACRE_COEUR),
    (SACRE_COEUR, VERSAILLES),
    (VERSAILLES, LUXEMBOURG),
    (LUXEMBOURG, DISNEYLAND),
    (DISNEYLAND, POMPIDOU),
    (POMPIDOU, ORSAY),
];

/// The Paris sample itinerary world. Root: Eiffel Tower (mandatory).
pub struct ParisSample;

impl GraphWorld for ParisSample {
    #[allow(clippy::unnecessary_literal_bound)]
    fn world_id(&self) -> &str {
        "paris_sample"
    }

    fn build(&self) -> Result<WorldGraph, GraphError> {
        let mut graph = ActivityGraph::new();
        for (name, hours, cost, score, description, location) in ATTRACTIONS {
            graph.add_node(
                NodeSpec::new(name, hours, cost, score)
                    .mandatory(name == EIFFEL_TOWER)
                    .description(description)
                    .location(location),
            )?;
        }
        for (parent, child) in LINKS {
            let parent = lookup(&graph, parent)?;
            let child = lookup(&graph, child)?;
            graph.add_edge(parent, child, Relation::Or)?;
        }
        let root = lookup(&graph, EIFFEL_TOWER)?;
        Ok(WorldGraph { graph, root })
    }
}

fn lookup(
    graph: &ActivityGraph,
    identifier: &str,
) -> Result<trailhead_kernel::graph::NodeId, GraphError> {
    graph
        .find(identifier)
        .ok_or_else(|| GraphError::UnknownIdentifier {
            identifier: identifier.to_string(),
        })
}
