use fokit::*;

/// Accept any configuration: the interactions are only filtered by the verifier
struct Enumerator {
    next: u64,
    count: usize,
}

impl SolutionUpdater for Enumerator {
    fn complete(&mut self, include: Option<&LiteralList>, exclude: &[LiteralList]) -> Option<LiteralList> {
        let total = 1u64 << self.count;
        while self.next < total {
            let bits = self.next;
            self.next += 1;
            let literals = (1..=self.count as i32)
                .map(|v| if bits & (1 << (v - 1)) != 0 { v } else { -v })
                .collect();
            let config = LiteralList::new(literals, Order::Natural).ok()?;
            if include.map_or(true, |i| config.contains_all(i)) && !exclude.iter().any(|e| config.contains_all(e)) {
                return Some(config);
            }
        }
        None
    }
}

fn main() -> Result<(), FokitError> {
    env_logger::init();

    let mut variables = VariableMap::new();
    let root = variables.add_boolean_variable(Some("Root"))?;
    let gui = variables.add_boolean_variable(Some("GUI"))?;
    let cli = variables.add_boolean_variable(Some("CLI"))?;
    let log = variables.add_boolean_variable(Some("Logging"))?;

    let expr = Expr::from(root)
        & Expr::cardinal(Cardinality::Choose(1), vec![gui.into(), cli.into()])
        & Expr::implies(log.into(), gui | cli);
    let formula = Formula::new(expr, variables);
    println!("Feature model: {}", formula);

    let cnf = CnfTransformer::default().execute(&formula, &NullMonitor)?;
    println!("CNF: {}", cnf);

    let tseytin = CnfTransformer::default()
        .with_maximum_number_of_literals(0)
        .execute(&formula, &NullMonitor)?;
    println!("Tseytin CNF over {} variables: {}", tseytin.variables().len(), tseytin);

    let clauses = Cnf::from_formula(&cnf)?;
    let mut dimacs = vec![];
    DimacsFormat.serialize(&clauses, &mut dimacs)?;
    println!("{}", String::from_utf8_lossy(&dimacs));

    // Collect the valid configurations
    let mut solutions = SolutionList::new(clauses.variables().clone());
    let mut enumerator = Enumerator { next: 0, count: 4 };
    while let Some(config) = enumerator.complete(None, &[]) {
        solutions.add_solution(config);
    }
    let valid: Vec<LiteralList> = solutions.valid_solutions(&clauses).cloned().collect();
    println!("{} valid configurations", valid.len());

    // Logging fails with the CLI
    let verifier = |c: &LiteralList| !(c.contains(3) && c.contains(4));
    let mut finder = SplitInteractionFinder::new(valid, Enumerator { next: 0, count: 4 }, verifier);
    for interaction in finder.find(2, 4, &NullMonitor)? {
        let names: Vec<String> = interaction
            .iter()
            .map(|l| {
                let name = clauses.variables().name(l.unsigned_abs() as usize).unwrap_or("?");
                if *l < 0 { format!("-{}", name) } else { name.to_string() }
            })
            .collect();
        println!("Failing interaction: {}", names.join(" & "));
    }
    Ok(())
}
