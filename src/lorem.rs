// lorem.rs — Deterministic filler text for benchmarks and tests.
//
// Produces natural-looking, moderately compressible prose: a weighted pool of
// Latin words arranged into sentences and paragraphs. The same seed always
// yields the same bytes.

use std::sync::OnceLock;

static WORDS: &[&str] = &[
    "lorem", "ipsum", "dolor", "sit", "amet", "consectetur", "adipiscing", "elit", "sed", "do",
    "eiusmod", "tempor", "incididunt", "ut", "labore", "et", "dolore", "magna", "aliqua", "enim",
    "ad", "minim", "veniam", "quis", "nostrud", "exercitation", "ullamco", "laboris", "nisi",
    "aliquip", "ex", "ea", "commodo", "consequat", "duis", "aute", "irure", "in",
    "reprehenderit", "voluptate", "velit", "esse", "cillum", "fugiat", "nulla", "pariatur",
    "excepteur", "sint", "occaecat", "cupidatat", "non", "proident", "sunt", "culpa", "qui",
    "officia", "deserunt", "mollit", "anim", "id", "est", "laborum", "at", "vero", "eos",
    "accusamus", "iusto", "odio", "dignissimos", "ducimus", "blanditiis", "praesentium",
    "voluptatum", "deleniti", "atque", "corrupti", "quos", "quas", "molestias", "excepturi",
    "occaecati", "similique", "mollitia", "animi", "nam", "libero", "tempore", "cum", "soluta",
    "nobis", "eligendi", "optio", "cumque", "nihil", "impedit", "quo", "minus", "maxime",
    "placeat", "facere", "possimus", "omnis", "voluptas", "assumenda", "repellendus",
];

/// Short words are drawn more often: weight by length, capped at the last entry.
const WEIGHT_BY_LEN: [usize; 6] = [0, 8, 6, 4, 3, 2];

/// The opening sentence of every generated buffer.
const OPENING: &str = "Lorem ipsum dolor sit amet, consectetur adipiscing elit, sed do eiusmod \
                       tempor incididunt ut labore et dolore magna aliqua. ";

/// Word indices repeated by weight, so a uniform pick follows the weighting.
fn weighted_pool() -> &'static [u16] {
    static POOL: OnceLock<Vec<u16>> = OnceLock::new();
    POOL.get_or_init(|| {
        WORDS
            .iter()
            .enumerate()
            .flat_map(|(i, w)| {
                let weight = WEIGHT_BY_LEN[w.len().min(WEIGHT_BY_LEN.len() - 1)];
                std::iter::repeat(i as u16).take(weight)
            })
            .collect()
    })
}

/// Text generator state.
struct Lorem {
    out: Vec<u8>,
    limit: usize,
    state: u32,
}

impl Lorem {
    /// Uniform value in `0..range`.
    fn next(&mut self, range: u32) -> u32 {
        self.state = (self.state.wrapping_mul(2_654_435_761) ^ 2_246_822_519).rotate_left(13);
        ((self.state as u64 * range as u64) >> 32) as u32
    }

    /// Roughly `target`, never zero.
    fn around(&mut self, target: u32) -> u32 {
        self.next(target) + self.next(target) + 1
    }

    fn full(&self) -> bool {
        self.out.len() >= self.limit
    }

    fn push(&mut self, bytes: &[u8]) {
        let room = self.limit - self.out.len();
        self.out.extend_from_slice(&bytes[..bytes.len().min(room)]);
    }

    fn sentence(&mut self) {
        let pool = weighted_pool();
        let words = self.around(11);
        let comma = self.around(9);
        let question = self.next(11) == 7;
        for i in 0..words {
            if self.full() {
                return;
            }
            let word = WORDS[pool[self.next(pool.len() as u32) as usize] as usize].as_bytes();
            if i == 0 {
                let mut capital = word.to_vec();
                capital[0] = capital[0].to_ascii_uppercase();
                self.push(&capital);
            } else {
                self.push(word);
            }
            let sep: &[u8] = match i {
                _ if i + 1 == words && question => b"? ",
                _ if i + 1 == words => b". ",
                _ if i == comma => b", ",
                _ => b" ",
            };
            self.push(sep);
        }
    }

    fn paragraph(&mut self) {
        for _ in 0..self.around(7) {
            self.sentence();
        }
        self.push(b"\n\n");
    }
}

/// Generate exactly `size` bytes of filler text from `seed`.
pub fn gen_buffer(size: usize, seed: u32) -> Vec<u8> {
    let mut lorem = Lorem { out: Vec::with_capacity(size), limit: size, state: seed };
    lorem.push(OPENING.as_bytes());
    while !lorem.full() {
        lorem.paragraph();
    }
    lorem.out
}
