//! SPARQL query construction.
//!
//! Exactly two query shapes are ever issued: list the entities of a
//! concept class, and count the outgoing predicates of one entity.

/// SELECT query listing every entity whose `rdf:type` is exactly the
/// given concept class.
pub fn entities_by_type(concept: &str) -> String {
    format!(
        "PREFIX rdf: <http://www.w3.org/1999/02/22-rdf-syntax-ns#>\n\
         SELECT DISTINCT ?entity WHERE {{\n\
           ?entity rdf:type <{concept}> .\n\
         }}"
    )
}

/// SELECT query counting, per outgoing predicate, how many times the
/// predicate occurs on the given entity.
pub fn predicate_counts(entity: &str) -> String {
    format!(
        "SELECT ?predicate (COUNT(?predicate) AS ?occurrences) WHERE {{\n\
           <{entity}> ?predicate ?object .\n\
         }}\n\
         GROUP BY ?predicate"
    )
}
