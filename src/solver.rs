//! Solveur 0/1 générique : le cœur ne connaît que ce contrat.
//!
//! Le modèle est un système linéaire de cardinalité : chaque contrainte
//! compare la somme de variables binaires distinctes à une constante.
//! Un solveur rend un verdict exact — assignation optimale ou
//! infaisabilité — jamais un résultat partiel. L'infaisabilité est une
//! réponse finale, pas une panne transitoire.

/// Sens de comparaison d'une contrainte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sense {
    Le,
    Ge,
    Eq,
}

/// Somme de variables binaires distinctes comparée à `rhs`.
#[derive(Debug, Clone)]
pub struct Constraint {
    pub terms: Vec<usize>,
    pub sense: Sense,
    pub rhs: usize,
}

impl Constraint {
    pub fn new(terms: Vec<usize>, sense: Sense, rhs: usize) -> Self {
        Self { terms, sense, rhs }
    }
}

/// Programme binaire complet : variables, contraintes, coût par variable.
/// Les coûts sont non négatifs ; l'objectif est de minimiser leur somme
/// sur les variables à 1.
#[derive(Debug, Clone, Default)]
pub struct BinaryModel {
    pub num_vars: usize,
    pub constraints: Vec<Constraint>,
    pub objective: Vec<u64>,
}

impl BinaryModel {
    pub fn new(num_vars: usize) -> Self {
        Self {
            num_vars,
            constraints: Vec::new(),
            objective: vec![0; num_vars],
        }
    }

    pub fn add_constraint(&mut self, terms: Vec<usize>, sense: Sense, rhs: usize) {
        self.constraints.push(Constraint::new(terms, sense, rhs));
    }

    pub fn set_cost(&mut self, var: usize, cost: u64) {
        self.objective[var] = cost;
    }
}

/// Verdict d'une résolution.
/// `BudgetExhausted` est distinct de l'infaisabilité : le budget de
/// nœuds a été dépassé avant preuve, le modèle reste indécidé.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Optimal { assignment: Vec<bool>, objective: u64 },
    Infeasible,
    BudgetExhausted,
}

/// Contrat du solveur : synchrone, bloquant, sans retry.
pub trait Solver {
    fn solve(&self, model: &BinaryModel) -> Verdict;
}

/// Solveur exact de référence : DFS avec propagation de cardinalité et
/// élagage par borne sur l'objectif. Le branchement vise d'abord la
/// contrainte de couverture (≥) la plus serrée et y choisit la variable
/// la moins coûteuse, valeur 1 en premier.
#[derive(Debug, Clone, Copy, Default)]
pub struct BranchBoundSolver {
    /// Budget de nœuds de branchement ; `None` = exact sans limite.
    pub node_limit: Option<u64>,
}

impl BranchBoundSolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_node_limit(limit: u64) -> Self {
        Self {
            node_limit: Some(limit),
        }
    }
}

impl Solver for BranchBoundSolver {
    fn solve(&self, model: &BinaryModel) -> Verdict {
        debug_assert_eq!(model.objective.len(), model.num_vars);
        let mut search = Search::new(model, self.node_limit);
        if !search.propagate_root() {
            return Verdict::Infeasible;
        }
        search.run();
        if search.exhausted {
            return Verdict::BudgetExhausted;
        }
        match search.best.take() {
            Some((assignment, objective)) => Verdict::Optimal {
                assignment,
                objective,
            },
            None => Verdict::Infeasible,
        }
    }
}

struct Search<'a> {
    model: &'a BinaryModel,
    /// Variable → contraintes qui la contiennent.
    occurs: Vec<Vec<usize>>,
    value: Vec<Option<bool>>,
    /// Compteurs incrémentaux par contrainte.
    ones: Vec<usize>,
    unfixed: Vec<usize>,
    trail: Vec<usize>,
    cost: u64,
    best: Option<(Vec<bool>, u64)>,
    nodes: u64,
    node_limit: Option<u64>,
    exhausted: bool,
}

impl<'a> Search<'a> {
    fn new(model: &'a BinaryModel, node_limit: Option<u64>) -> Self {
        let mut occurs = vec![Vec::new(); model.num_vars];
        for (ci, c) in model.constraints.iter().enumerate() {
            for &t in &c.terms {
                occurs[t].push(ci);
            }
        }
        Self {
            model,
            occurs,
            value: vec![None; model.num_vars],
            ones: vec![0; model.constraints.len()],
            unfixed: model.constraints.iter().map(|c| c.terms.len()).collect(),
            trail: Vec::new(),
            cost: 0,
            best: None,
            nodes: 0,
            node_limit,
            exhausted: false,
        }
    }

    /// Fixe `var`, propage à point fixe. `false` = contradiction.
    fn assign(&mut self, var: usize, val: bool) -> bool {
        let model = self.model;
        let mut queue = vec![(var, val)];
        while let Some((v, b)) = queue.pop() {
            match self.value[v] {
                Some(cur) if cur == b => continue,
                Some(_) => return false,
                None => {}
            }
            self.value[v] = Some(b);
            self.trail.push(v);
            if b {
                self.cost += model.objective[v];
            }
            for i in 0..self.occurs[v].len() {
                let ci = self.occurs[v][i];
                self.unfixed[ci] -= 1;
                if b {
                    self.ones[ci] += 1;
                }
                if !self.enqueue_forced(ci, &mut queue) {
                    return false;
                }
            }
        }
        true
    }

    /// Règles de cardinalité sur la contrainte `ci` :
    /// borne haute atteinte → zéros forcés, marge épuisée → uns forcés.
    fn enqueue_forced(&self, ci: usize, queue: &mut Vec<(usize, bool)>) -> bool {
        let c = &self.model.constraints[ci];
        let ones = self.ones[ci];
        let unfixed = self.unfixed[ci];
        if matches!(c.sense, Sense::Le | Sense::Eq) {
            if ones > c.rhs {
                return false;
            }
            if ones == c.rhs && unfixed > 0 {
                for &t in &c.terms {
                    if self.value[t].is_none() {
                        queue.push((t, false));
                    }
                }
            }
        }
        if matches!(c.sense, Sense::Ge | Sense::Eq) {
            if ones + unfixed < c.rhs {
                return false;
            }
            if ones + unfixed == c.rhs && unfixed > 0 {
                for &t in &c.terms {
                    if self.value[t].is_none() {
                        queue.push((t, true));
                    }
                }
            }
        }
        true
    }

    /// Passe initiale : contraintes dégénérées (somme ≤ 0, variable
    /// unique forcée, ≥ insatisfiable) se résolvent avant tout branchement.
    fn propagate_root(&mut self) -> bool {
        for ci in 0..self.model.constraints.len() {
            let mut queue = Vec::new();
            if !self.enqueue_forced(ci, &mut queue) {
                return false;
            }
            for (v, b) in queue {
                if !self.assign(v, b) {
                    return false;
                }
            }
        }
        true
    }

    fn undo_to(&mut self, mark: usize) {
        while self.trail.len() > mark {
            let v = self.trail.pop().expect("non-empty trail");
            let was_one = self.value[v] == Some(true);
            if was_one {
                self.cost -= self.model.objective[v];
            }
            self.value[v] = None;
            for i in 0..self.occurs[v].len() {
                let ci = self.occurs[v][i];
                self.unfixed[ci] += 1;
                if was_one {
                    self.ones[ci] -= 1;
                }
            }
        }
    }

    /// Variable de branchement : contrainte basse insatisfaite la plus
    /// serrée, puis variable libre la moins coûteuse (premier index).
    fn pick_branch(&self) -> Option<usize> {
        let mut tightest: Option<(usize, usize)> = None;
        for (ci, c) in self.model.constraints.iter().enumerate() {
            if !matches!(c.sense, Sense::Ge | Sense::Eq) || self.ones[ci] >= c.rhs {
                continue;
            }
            let slack = self.ones[ci] + self.unfixed[ci] - c.rhs;
            match tightest {
                Some((s, _)) if s <= slack => {}
                _ => tightest = Some((slack, ci)),
            }
        }
        let (_, ci) = tightest?;
        let mut var: Option<usize> = None;
        for &t in &self.model.constraints[ci].terms {
            if self.value[t].is_none()
                && var.map_or(true, |v| self.model.objective[t] < self.model.objective[v])
            {
                var = Some(t);
            }
        }
        var
    }

    fn run(&mut self) {
        if self.exhausted {
            return;
        }
        if let Some((_, best_cost)) = &self.best {
            if self.cost >= *best_cost {
                return;
            }
        }
        let Some(var) = self.pick_branch() else {
            // Toutes les bornes basses sont couvertes : compléter par des
            // zéros est faisable et de coût minimal pour ce nœud.
            let assignment = self.value.iter().map(|v| v.unwrap_or(false)).collect();
            self.best = Some((assignment, self.cost));
            return;
        };
        self.nodes += 1;
        if let Some(limit) = self.node_limit {
            if self.nodes > limit {
                self.exhausted = true;
                return;
            }
        }
        for val in [true, false] {
            let mark = self.trail.len();
            if self.assign(var, val) {
                self.run();
            }
            self.undo_to(mark);
            if self.exhausted {
                return;
            }
        }
    }
}
