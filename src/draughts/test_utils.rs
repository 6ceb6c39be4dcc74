use super::{Candidates, Field};

pub fn assert_landings(generated: &Candidates, expected: &[(u8, u8)]) {
    let generated: Vec<Field> = generated.keys().copied().collect();
    let mut expected: Vec<Field> = expected.iter().map(|&(row, col)| Field::new(row, col)).collect();
    expected.sort();

    assert_eq!(generated, expected);
}
