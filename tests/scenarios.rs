use fokit::combinations::{CombinationIterator, LexicographicIterator};
use fokit::normal_forms::{is_clausal_nf, NormalForm};
use fokit::*;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::HashSet;
use test_log::test;

fn lit(i: isize) -> Expr {
    Expr::literal(i.unsigned_abs(), i > 0)
}

fn natural(lits: &[i32]) -> LiteralList {
    LiteralList::new(lits.to_vec(), Order::Natural).unwrap()
}

fn formula(e: Expr, count: usize) -> Formula {
    let names: Vec<String> = (1..=count).map(|i| format!("x{}", i)).collect();
    let variables = VariableMap::from_names(names.iter().map(|s| s.as_str())).unwrap();
    Formula::new(e, variables)
}

/// Check that an assignment of the original variables extends to a model of the result iff it is a model of f
fn satisfiable_extension(f: &Formula, result: &Formula, bits: u64) {
    let count = f.variables().len();
    let aux = result.variables().len() - count;
    let expected = f.eval(&IndexAssignment::from_bits(count, bits));
    let found = (0..(1u64 << aux))
        .any(|ext| result.eval(&IndexAssignment::from_bits(count + aux, bits | (ext << count))) == Some(true));
    assert_eq!(expected, Some(found), "{} -> {}", f, result);
}

fn assert_equisatisfiable(f: &Formula, result: &Formula) {
    for bits in 0..(1u64 << f.variables().len()) {
        satisfiable_extension(f, result, bits);
    }
}

fn clause_lists(f: &Formula) -> Vec<Vec<i32>> {
    Cnf::from_formula(f)
        .unwrap()
        .clauses()
        .iter()
        .map(|c| c.literals().to_vec())
        .collect()
}

#[test]
fn implication() -> Result<(), FokitError> {
    let f = formula(Expr::implies(lit(1), lit(2)), 2);

    let cnf = CnfTransformer::default().execute(&f, &NullMonitor)?;
    assert!(cnf.expr().equals_unordered(&Expr::And(vec![Expr::Or(vec![lit(-1), lit(2)])])));

    let dnf = DnfTransformer::default().execute(&f, &NullMonitor)?;
    let expected = Expr::Or(vec![Expr::And(vec![lit(-1)]), Expr::And(vec![lit(2)])]);
    assert!(dnf.expr().equals_unordered(&expected));
    Ok(())
}

#[test]
fn mixed_conjuncts() -> Result<(), FokitError> {
    let e = (lit(1) | lit(-3)) & Expr::implies(lit(2), lit(1) | lit(3));
    let f = formula(e, 3);
    let cnf = CnfTransformer::default().execute(&f, &NullMonitor)?;
    assert_eq!(cnf.variables(), f.variables());
    assert_eq!(clause_lists(&cnf), vec![vec![-3, 1], vec![-2, 1, 3]]);
    assert_equisatisfiable(&f, &cnf);
    Ok(())
}

#[test]
fn budget_fallback() -> Result<(), FokitError> {
    // Or over 5 conjunctions of 5 distinct variables
    let products: Vec<Expr> = (0..5)
        .map(|i| Expr::And((1..=5).map(|j| lit(i * 5 + j)).collect()))
        .collect();
    let f = formula(Expr::Or(products), 25);
    let transformer = CnfTransformer::default().with_maximum_number_of_literals(50);
    let cnf = transformer.execute(&f, &NullMonitor)?;

    assert!(is_clausal_nf(cnf.expr(), NormalForm::Cnf));
    let aux = cnf.variables().len() - 25;
    assert!(aux > 0 && aux <= 6, "{} auxiliary variables", aux);
    assert!(cnf.variables().names().skip(25).all(|n| n.starts_with("__temp__")));

    // linear number of clauses
    let clauses = Cnf::from_formula(&cnf)?;
    assert!(clauses.len() <= 2 * f.expr().size(), "{} clauses", clauses.len());

    let mut rng = ChaCha8Rng::seed_from_u64(0);
    for _ in 0..200 {
        satisfiable_extension(&f, &cnf, rng.gen_range(0..(1u64 << 25)));
    }
    // models with a single satisfied product
    for i in 0..5 {
        satisfiable_extension(&f, &cnf, 0b11111 << (5 * i));
        satisfiable_extension(&f, &cnf, 0b11110 << (5 * i));
    }
    Ok(())
}

#[test]
fn lexicographic_pairs() {
    let mut it = LexicographicIterator::new(2, 4);
    assert_eq!(it.size(), 6);
    for expected in [[0, 1], [0, 2], [0, 3], [1, 2], [1, 3], [2, 3]] {
        assert_eq!(it.next(), Some(expected.to_vec()));
    }
    assert_eq!(it.next(), None);
}

struct Unsatisfiable;

impl SolutionUpdater for Unsatisfiable {
    fn complete(&mut self, _include: Option<&LiteralList>, _exclude: &[LiteralList]) -> Option<LiteralList> {
        None
    }
}

#[test]
fn single_failing_literal() -> Result<(), FokitError> {
    let mut sample: Vec<LiteralList> = (0..4u32)
        .map(|bits| {
            let lits: Vec<i32> = [1, 2, 4, 5, 6]
                .iter()
                .enumerate()
                .map(|(k, v)| if bits & (1 << (k % 2)) != 0 { *v } else { -*v })
                .chain([3])
                .collect();
            natural(&lits)
        })
        .collect();
    sample.push(natural(&[-3]));

    let verifier = |c: &LiteralList| !c.contains(-3);
    let mut finder = RandomInteractionFinder::new(sample.clone(), Unsatisfiable, verifier);
    assert_eq!(finder.compute_potential_interactions(2), vec![natural(&[-3])]);
    assert_eq!(finder.find(2, 6, &NullMonitor)?, vec![natural(&[-3])]);
    assert_eq!(finder.statistics().correct_configurations.len(), 4);
    assert!(finder.statistics().interaction_counts.is_empty());

    let mut finder = SplitInteractionFinder::new(sample, Unsatisfiable, verifier);
    assert_eq!(finder.find(2, 6, &NullMonitor)?, vec![natural(&[-3])]);
    Ok(())
}

#[test]
fn shared_tseytin_definitions() -> Result<(), FokitError> {
    let g = (lit(1) & lit(2)) | (lit(-3) & lit(4));
    let f = formula(g.clone() & g.clone(), 4);
    let transformer = CnfTransformer::default().with_maximum_number_of_literals(0);
    let cnf = transformer.execute(&f, &NullMonitor)?;
    let once = transformer.execute(&formula(g, 4), &NullMonitor)?;

    // both occurrences use the same auxiliary variables and the same clauses
    assert_eq!(cnf.variables().len(), once.variables().len());
    assert_eq!(clause_lists(&cnf), clause_lists(&once));
    assert_equisatisfiable(&f, &cnf);
    Ok(())
}

#[test]
fn preserved_evaluation() -> Result<(), FokitError> {
    let formulas = vec![
        Expr::biimplies(lit(1), lit(2) & lit(-3)),
        !((lit(1) | lit(2)) & Expr::implies(lit(3), lit(-4))),
        Expr::cardinal(Cardinality::AtMost(1), vec![lit(1), lit(2), lit(3), lit(4)]),
        Expr::cardinal(Cardinality::Choose(2), vec![lit(1), lit(-2), lit(3)]) | (lit(4) & lit(1)),
        Expr::quantified(Quantifier::Exists, 2, (lit(1) | lit(2)) & (lit(-2) | lit(3))),
    ];
    for e in formulas {
        let f = formula(e, 4);
        for budget in [usize::MAX, 6, 0] {
            let transformer = CnfTransformer::default().with_maximum_number_of_literals(budget);
            let cnf = transformer.execute(&f, &NullMonitor)?;
            assert!(is_clausal_nf(cnf.expr(), NormalForm::Cnf), "{}", cnf);
            assert_equisatisfiable(&f, &cnf);
        }
        let dnf = DnfTransformer::default().execute(&f, &NullMonitor)?;
        assert!(is_clausal_nf(dnf.expr(), NormalForm::Dnf), "{}", dnf);
        assert_eq!(dnf.variables().len(), 4);
        assert_equisatisfiable(&f, &dnf);
    }
    Ok(())
}

#[test]
fn parallel_transformation() -> Result<(), FokitError> {
    let conjuncts: Vec<Expr> = (1..=5)
        .map(|i| (lit(i) & lit(i + 1)) | (lit(-i) & lit(i + 2)) | lit(7))
        .collect();
    let f = formula(Expr::And(conjuncts), 7);
    let transformer = CnfTransformer::default().with_maximum_number_of_literals(4);
    let sequential = transformer.execute(&f, &NullMonitor)?;
    let parallel = transformer.clone().with_parallel(true).execute(&f, &NullMonitor)?;
    assert_eq!(sequential.expr(), parallel.expr());
    assert_eq!(sequential.variables(), parallel.variables());
    Ok(())
}

#[test]
fn cloned_maps_are_independent() -> Result<(), FokitError> {
    let original = VariableMap::from_names(["a", "b"])?;
    let mut copy = original.clone();
    copy.rename(1, "renamed")?;
    copy.add_boolean_variable(None)?;
    assert_eq!(original.name(1), Some("a"));
    assert_eq!(original.len(), 2);
    assert_ne!(original, copy);
    Ok(())
}

#[test]
fn literal_set_laws() {
    let a = natural(&[3, -1, 2]);
    let b = LiteralList::new(vec![2, 3, -1], Order::Unordered).unwrap();
    assert!(a.contains_all(&b) && b.contains_all(&a));
    assert_eq!(a.negate().negate(), a);
    assert_eq!(b.negate().negate(), b);
}

#[test]
fn combination_bijection() {
    for id in [IteratorId::Lexicographic, IteratorId::RandomPartition, IteratorId::Default] {
        let mut seen = HashSet::new();
        let mut it = id.create(3, 8);
        let size = it.size();
        for subset in &mut it {
            assert!(subset.windows(2).all(|w| w[0] < w[1]));
            assert!(seen.insert(subset));
        }
        assert_eq!(seen.len() as u64, size);
        assert_eq!(size, 56);
    }
}

#[test]
fn dimacs_exchange() -> Result<(), FokitError> {
    let f = formula((lit(1) & lit(2)) | (lit(3) & lit(-4)), 4);
    let cnf = CnfTransformer::default().with_maximum_number_of_literals(0).execute(&f, &NullMonitor)?;
    let clauses = Cnf::from_formula(&cnf)?;

    let mut buffer = vec![];
    DimacsFormat.serialize(&clauses, &mut buffer)?;
    let parsed = DimacsFormat.parse(&mut buffer.as_slice())?;
    assert_eq!(parsed, clauses);
    assert_eq!(parsed.variables().name(1), Some("x1"));
    Ok(())
}
