use xxhash_rust::xxh3::Xxh3;

use crate::dataset::model::{Dialog, EdgeDef, Network, NodeDef, RawGender, WordCount};
use crate::foundation::core::Gender;
use crate::gender::resolver::GenderSource;

const XXH3_SEED: u64 = 0x5d1e_77a3_c0b4_9e21;

/// Content fingerprint of a projection's inputs.
///
/// Two inputs with the same fingerprint produce the same aggregation, so views can be memoized
/// by content instead of by identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint {
    /// High 64 bits of the digest.
    pub hi: u64,
    /// Low 64 bits of the digest.
    pub lo: u64,
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:016x}{:016x}", self.hi, self.lo)
    }
}

/// Fingerprint of a `(network, gender source, word counts)` aggregation input.
pub fn fingerprint_speech<G: GenderSource + ?Sized>(
    network: &Network,
    genders: &G,
    word_counts: Option<&[WordCount]>,
) -> Fingerprint {
    let mut h = StableHasher::new();
    h.write_u8(b'S');
    write_network(&mut h, network);
    write_genders(&mut h, genders);
    match word_counts {
        Some(rows) => {
            h.write_bool(true);
            h.write_u32(rows.len() as u32);
            for r in rows {
                h.write_opt_str(r.character.as_deref());
                h.write_f64(r.words);
            }
        }
        None => h.write_bool(false),
    }
    h.finish()
}

/// Fingerprint of a dialog selection plus the gender source it is resolved against.
pub fn fingerprint_dialogs<'a, I, G>(dialogs: I, genders: &G) -> Fingerprint
where
    I: IntoIterator<Item = &'a Dialog>,
    G: GenderSource + ?Sized,
{
    let mut h = StableHasher::new();
    h.write_u8(b'D');
    let mut n = 0u32;
    for d in dialogs {
        write_dialog(&mut h, d);
        n += 1;
    }
    h.write_u32(n);
    write_genders(&mut h, genders);
    h.finish()
}

struct StableHasher {
    inner: Xxh3,
}

impl StableHasher {
    fn new() -> Self {
        Self {
            inner: Xxh3::with_seed(XXH3_SEED),
        }
    }

    fn write_bytes(&mut self, b: &[u8]) {
        self.inner.update(b);
    }

    fn write_u8(&mut self, v: u8) {
        self.write_bytes(&[v]);
    }

    fn write_bool(&mut self, v: bool) {
        self.write_u8(u8::from(v));
    }

    fn write_u32(&mut self, v: u32) {
        self.write_bytes(&v.to_le_bytes());
    }

    fn write_f64(&mut self, v: f64) {
        self.write_bytes(&v.to_bits().to_le_bytes());
    }

    fn write_str(&mut self, s: &str) {
        self.write_u32(s.len() as u32);
        self.write_bytes(s.as_bytes());
    }

    fn write_opt_str(&mut self, s: Option<&str>) {
        match s {
            Some(s) => {
                self.write_bool(true);
                self.write_str(s);
            }
            None => self.write_bool(false),
        }
    }

    fn write_opt_f64(&mut self, v: Option<f64>) {
        match v {
            Some(v) => {
                self.write_bool(true);
                self.write_f64(v);
            }
            None => self.write_bool(false),
        }
    }

    fn finish(self) -> Fingerprint {
        let v = self.inner.digest128();
        Fingerprint {
            hi: (v >> 64) as u64,
            lo: v as u64,
        }
    }
}

fn write_network(h: &mut StableHasher, network: &Network) {
    h.write_u32(network.nodes.len() as u32);
    for n in &network.nodes {
        write_node(h, n);
    }
    h.write_u32(network.edges.len() as u32);
    for e in &network.edges {
        write_edge(h, e);
    }
}

fn write_node(h: &mut StableHasher, n: &NodeDef) {
    h.write_opt_str(n.id.as_deref());
    match &n.gender {
        None => h.write_u8(0),
        Some(RawGender::Flag(f)) => {
            h.write_u8(1);
            h.write_bool(*f);
        }
        Some(RawGender::Code(c)) => {
            h.write_u8(2);
            h.write_str(c);
        }
    }
}

fn write_edge(h: &mut StableHasher, e: &EdgeDef) {
    h.write_opt_str(e.source.as_deref());
    h.write_opt_str(e.target.as_deref());
    h.write_opt_f64(e.count);
    h.write_opt_f64(e.weight);
    h.write_opt_f64(e.avg_len_a);
    h.write_opt_f64(e.avg_len_b);
}

fn write_dialog(h: &mut StableHasher, d: &Dialog) {
    h.write_u32(d.speakers.len() as u32);
    for s in &d.speakers {
        h.write_str(s);
    }
    h.write_opt_str(d.act.as_deref());
    h.write_opt_str(d.scene.as_deref());
    h.write_f64(d.length);
    h.write_f64(d.total_words);
}

fn write_genders<G: GenderSource + ?Sized>(h: &mut StableHasher, genders: &G) {
    h.write_u8(genders.kind());
    let mut n = 0u32;
    genders.visit_entries(&mut |name, gender| {
        h.write_str(name);
        h.write_u8(match gender {
            Gender::Female => b'F',
            Gender::Male => b'M',
            Gender::Unknown => b'?',
        });
        n += 1;
    });
    h.write_u32(n);
}

#[cfg(test)]
#[path = "../../tests/unit/cache/fingerprint.rs"]
mod tests;
