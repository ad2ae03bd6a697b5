//! Deep structural equality with a visited-pair cache.
//!
//! Two type graphs are compared with an explicit worklist. Each pair of node
//! indices is encoded as bytes and inserted into a `Bcache`; a pair that was
//! already present has been (or is being) checked, which also terminates the
//! walk on recursive types.

use bcache::Bcache;

#[derive(Debug)]
enum Ty {
    Int,
    Char,
    Pointer(usize),
    Struct(&'static str, Vec<usize>),
}

fn encode_pair(a: usize, b: usize) -> [u8; 16] {
    let mut out = [0u8; 16];
    out[..8].copy_from_slice(&(a as u64).to_le_bytes());
    out[8..].copy_from_slice(&(b as u64).to_le_bytes());
    out
}

fn shallow_equal(worklist: &mut Vec<(usize, usize)>, a: &Ty, b: &Ty) -> bool {
    match (a, b) {
        (Ty::Int, Ty::Int) | (Ty::Char, Ty::Char) => true,
        (Ty::Pointer(x), Ty::Pointer(y)) => {
            worklist.push((*x, *y));
            true
        },
        (Ty::Struct(na, fa), Ty::Struct(nb, fb)) => {
            if na != nb || fa.len() != fb.len() {
                return false;
            }
            worklist.extend(fa.iter().copied().zip(fb.iter().copied()));
            true
        },
        _ => false,
    }
}

fn types_deeply_equal(left: &[Ty], right: &[Ty], a: usize, b: usize) -> bool {
    let mut visited = Bcache::new();
    let mut worklist = vec![(a, b)];
    while let Some((x, y)) = worklist.pop() {
        let (_, added) = visited
            .insert(&encode_pair(x, y))
            .expect("16-byte pairs fit an entry");
        if !added {
            continue;
        }
        if !shallow_equal(&mut worklist, &left[x], &right[y]) {
            return false;
        }
    }
    true
}

fn main() {
    // struct list { int value; struct list *next; }
    let left = vec![
        Ty::Struct("list", vec![1, 2]),
        Ty::Int,
        Ty::Pointer(0),
    ];
    let same = vec![
        Ty::Struct("list", vec![1, 2]),
        Ty::Int,
        Ty::Pointer(0),
    ];
    let different = vec![
        Ty::Struct("list", vec![1, 2]),
        Ty::Char,
        Ty::Pointer(0),
    ];

    println!("left == same: {}", types_deeply_equal(&left, &same, 0, 0));
    println!(
        "left == different: {}",
        types_deeply_equal(&left, &different, 0, 0)
    );
}
