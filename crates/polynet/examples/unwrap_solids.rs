//! Print unwrap counts for the built-in solids.
//!
//! Usage:
//!   cargo run -p polynet --example unwrap_solids
//!   cargo run -p polynet --example unwrap_solids -- dodecahedron
//!
//! Prints faces, folds, cuts, and anomaly count per solid, then the native net
//! text of the named solid (if given).

use polynet::format::render_net;
use polynet::poly3::Polyhedron;
use polynet::shapes;
use polynet::unwrap::{unwrap_with_stats, UnwrapCfg};

fn solids() -> Vec<(&'static str, Polyhedron)> {
    vec![
        ("tetrahedron", shapes::tetrahedron()),
        ("cube", shapes::cube(1.0)),
        ("octahedron", shapes::octahedron()),
        ("dodecahedron", shapes::dodecahedron()),
        ("icosahedron", shapes::icosahedron()),
        ("prism", shapes::prism(6, 1.0, 0.5)),
    ]
}

fn main() {
    let pick = std::env::args().nth(1);
    for (name, poly) in solids() {
        let (net, log, stats) = match unwrap_with_stats(&poly, &UnwrapCfg::default()) {
            Ok(r) => r,
            Err(e) => {
                eprintln!("{name}: {e}");
                continue;
            }
        };
        println!(
            "{name:<13} faces={:<3} folds={:<3} cuts={:<3} anomalies={}",
            stats.faces_placed,
            stats.folds,
            stats.cuts,
            log.len()
        );
        if pick.as_deref() == Some(name) {
            print!("{}", render_net(&net));
        }
    }
}
