use skelter::prelude::*;

fn sorted_rows(matrix: &Matrix<i64>) -> Vec<Vec<i64>> {
    let mut rows: Vec<Vec<i64>> = matrix.iter().map(<[i64]>::to_vec).collect();
    rows.sort();
    rows
}

fn sorted_facets(output: &DdOutput<i64>) -> Vec<usize> {
    let mut facets = output.facets.clone();
    facets.sort_unstable();
    facets
}

/// Cone over the octahedron: `w − s·x ≥ 0` for every sign vector `s`.
/// Six extreme rays `(±e_i, 1)`, each on four facets, so adjacency
/// certification actually has to work.
fn octahedron_cone() -> Matrix<i64> {
    let mut rows = Vec::new();
    for s1 in [1i64, -1] {
        for s2 in [1i64, -1] {
            for s3 in [1i64, -1] {
                rows.push(vec![-s1, -s2, -s3, 1]);
            }
        }
    }
    Matrix::from_rows(rows)
}

fn octahedron_rays() -> Vec<Vec<i64>> {
    let mut rays = vec![
        vec![1, 0, 0, 1],
        vec![-1, 0, 0, 1],
        vec![0, 1, 0, 1],
        vec![0, -1, 0, 1],
        vec![0, 0, 1, 1],
        vec![0, 0, -1, 1],
    ];
    rays.sort();
    rays
}

#[test]
fn quadrant_has_the_two_axis_rays() {
    let a = Matrix::parse_text("2 2\n1 0\n0 1").unwrap();
    let output = dual_description(&a, &DdOptions::default(), &Tolerance::exact()).unwrap();
    assert_eq!(sorted_rows(&output.rays), vec![vec![0, 1], vec![1, 0]]);
    assert_eq!(sorted_facets(&output), vec![0, 1]);
    assert_eq!(output.summary.num_edges(), 2);
}

#[test]
fn positive_orthant_rays_are_the_standard_basis() {
    let a = Matrix::identity(3);
    let output = dual_description(&a, &DdOptions::default(), &Tolerance::exact()).unwrap();
    assert_eq!(
        sorted_rows(&output.rays),
        vec![vec![0, 0, 1], vec![0, 1, 0], vec![1, 0, 0]]
    );
    assert_eq!(sorted_facets(&output), vec![0, 1, 2]);
    assert_eq!(output.summary.num_edges(), 3);
}

#[test]
fn homogenized_square_has_four_rays_and_four_facets() {
    // |x| <= z, |y| <= z as a cone in R^3.
    let a = Matrix::from_rows(vec![
        vec![-1, 0, 1],
        vec![1, 0, 1],
        vec![0, -1, 1],
        vec![0, 1, 1],
    ]);
    let output = dual_description(&a, &DdOptions::default(), &Tolerance::exact()).unwrap();
    assert_eq!(
        sorted_rows(&output.rays),
        vec![
            vec![-1, -1, 1],
            vec![-1, 1, 1],
            vec![1, -1, 1],
            vec![1, 1, 1],
        ]
    );
    assert_eq!(sorted_facets(&output), vec![0, 1, 2, 3]);
    assert_eq!(output.summary.num_edges(), 4);
    assert_eq!(output.summary.num_iterations(), 1);
}

#[test]
fn redundant_row_never_becomes_a_facet() {
    // Row 2 is the sum of rows 0 and 1.
    let a = Matrix::from_rows(vec![vec![1, 0], vec![0, 1], vec![1, 1]]);
    let output = dual_description(&a, &DdOptions::default(), &Tolerance::exact()).unwrap();
    assert_eq!(sorted_facets(&output), vec![0, 1]);
}

#[test]
fn octahedron_cone_under_every_configuration() {
    let a = octahedron_cone();
    let expected = octahedron_rays();
    for order in [
        PivotingOrder::Quickhull,
        PivotingOrder::MinIndex,
        PivotingOrder::MaxIndex,
        PivotingOrder::LexMin,
        PivotingOrder::LexMax,
        PivotingOrder::Random,
    ] {
        for representation in [SetRepresentation::SortedVector, SetRepresentation::BitField] {
            for test in [AdjacencyTest::Graph, AdjacencyTest::Combinatoric] {
                for plus_plus in [false, true] {
                    let options = DdOptions::default()
                        .with_pivoting_order(order)
                        .with_adjacency_test(test)
                        .with_set_representation(representation)
                        .with_plus_plus(plus_plus)
                        .with_random_seed(17);
                    let output = dual_description(&a, &options, &Tolerance::exact()).unwrap();
                    assert_eq!(
                        sorted_rows(&output.rays),
                        expected,
                        "order {order}, {representation}, {test}, plusplus {plus_plus}"
                    );
                    assert_eq!(sorted_facets(&output), (0..8).collect::<Vec<_>>());
                    assert_eq!(output.summary.num_edges(), 12);
                }
            }
        }
    }
}

#[test]
fn lineality_directions_come_back_as_sign_flipped_pairs() {
    // A single halfspace: the cone is a halfplane with lineality (1, -1).
    let a = Matrix::from_rows(vec![vec![1, 1]]);
    let output = dual_description(&a, &DdOptions::default(), &Tolerance::exact()).unwrap();
    let rows = sorted_rows(&output.rays);
    assert_eq!(rows.len(), 3);
    // One lineality pair plus one genuine ray.
    let pair: Vec<&Vec<i64>> = rows.iter().filter(|r| r[0] + r[1] == 0).collect();
    assert_eq!(pair.len(), 2);
    assert_eq!(pair[0], &vec![-1, 1]);
    assert_eq!(pair[1], &vec![1, -1]);
}

#[test]
fn duality_round_trip_passes_the_checker() {
    let a = octahedron_cone();
    let options = DdOptions::default();
    let tol = Tolerance::exact();
    let output = dual_description(&a, &options, &tol).unwrap();
    assert!(check_dual_description(&a, &output.rays, &output.facets, &options, &tol).unwrap());
}

#[test]
fn checker_rejects_an_infeasible_ray() {
    let a = Matrix::identity(2);
    let options = DdOptions::default();
    let tol = Tolerance::exact();
    let bogus = Matrix::from_rows(vec![vec![1, 0], vec![0, -1]]);
    assert!(!check_dual_description(&a, &bogus, &[0, 1], &options, &tol).unwrap());
}

#[test]
fn floating_point_orthant() {
    let a = Matrix::<f64>::parse_text("2 2\n1 0\n0 1").unwrap();
    let tol = Tolerance::new(1e-8);
    let output = dual_description(&a, &DdOptions::default(), &tol).unwrap();
    let mut rows: Vec<Vec<f64>> = output.rays.iter().map(<[f64]>::to_vec).collect();
    rows.sort_by(|a, b| a.partial_cmp(b).unwrap());
    assert_eq!(rows, vec![vec![0.0, 1.0], vec![1.0, 0.0]]);
}

#[test]
fn processed_count_is_monotone_under_static_orders() {
    // Indirect check of progress: the run terminates with every row
    // processed and the iteration counter bounded by the row count.
    let a = octahedron_cone();
    let options = DdOptions::default().with_pivoting_order(PivotingOrder::MinIndex);
    let output = dual_description(&a, &options, &Tolerance::exact()).unwrap();
    assert!(output.summary.num_iterations() <= a.row_count() as u64);
    assert_eq!(output.summary.num_facets(), 8);
}
