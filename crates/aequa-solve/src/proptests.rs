//! Property-based tests for linear solving.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use aequa_core::{Context, SharedPreferences};
    use aequa_simplify::{is_null, standard_form, ReductionContext, TrinaryBoolean};

    use crate::{EquationStore, Outcome, System};

    const NAMES: [&str; 4] = ["x", "y", "z", "w"];

    fn determinant(rows: &[Vec<i64>]) -> i64 {
        if rows.len() == 1 {
            return rows[0][0];
        }
        let mut sum = 0;
        for (column, &entry) in rows[0].iter().enumerate() {
            let minor: Vec<Vec<i64>> = rows[1..]
                .iter()
                .map(|row| {
                    row.iter()
                        .enumerate()
                        .filter(|(j, _)| *j != column)
                        .map(|(_, v)| *v)
                        .collect()
                })
                .collect();
            let sign = if column % 2 == 0 { 1 } else { -1 };
            sum += sign * entry * determinant(&minor);
        }
        sum
    }

    fn equation(row: &[i64], constant: i64) -> String {
        let lhs = row
            .iter()
            .zip(NAMES)
            .map(|(a, name)| format!("({a})*{name}"))
            .collect::<Vec<_>>()
            .join("+");
        format!("{lhs}=({constant})")
    }

    fn square_system() -> impl Strategy<Value = (Vec<Vec<i64>>, Vec<i64>)> {
        (2usize..=4).prop_flat_map(|n| {
            (
                prop::collection::vec(prop::collection::vec(-5i64..=5, n), n),
                prop::collection::vec(-9i64..=9, n),
            )
        })
    }

    proptest! {
        #[test]
        fn unique_solutions_satisfy_every_equation((rows, constants) in square_system()) {
            prop_assume!(determinant(&rows) != 0);

            let mut ctx = Context::new();
            let mut store = EquationStore::new();
            for (row, constant) in rows.iter().zip(&constants) {
                store.add(&mut ctx, &equation(row, *constant)).unwrap();
            }
            let mut system = System::new(SharedPreferences::default());
            prop_assert_eq!(system.exact_solve(&store, &mut ctx), Ok(Outcome::Solved));
            prop_assert_eq!(system.number_of_solutions(), rows.len());
            prop_assert!(!system.has_more_solutions());

            let names: Vec<String> = system.variable_names(&ctx).into_iter().map(str::to_owned).collect();
            let texts: Vec<String> = system
                .solutions()
                .iter()
                .map(|s| {
                    s.exact_layout()
                        .or(s.approximate_layout())
                        .map(|l| l.text().to_owned())
                        .unwrap()
                })
                .collect();
            for (name, text) in names.iter().zip(&texts) {
                ctx.define(name, text).unwrap();
            }

            let reduction = ReductionContext::default();
            for stored in store.iter() {
                let form = standard_form(&mut ctx, stored.equation(), &reduction);
                prop_assert_eq!(is_null(ctx.arena(), form, &reduction), TrinaryBoolean::True);
            }
        }
    }
}
