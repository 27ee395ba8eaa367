use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{InvalidViolation, UnknownRule};

/// Rules documentation page. Rule-id links always point here.
pub const DOCS_BASE_URL: &str = "https://github.com/ericcornelissen/ades/blob/main/RULES.md";

/// Identifier of an analyzer rule, e.g. `ADES100`.
///
/// Always non-empty; construction goes through [`RuleId::new`] or the
/// payload decoder, both of which reject the empty string.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct RuleId(String);

impl RuleId {
    pub fn new(id: impl Into<String>) -> Option<Self> {
        let id = id.into();
        if id.is_empty() { None } else { Some(Self(id)) }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Documentation link for this rule.
    ///
    /// The id is used verbatim as the fragment; escaping for the attribute
    /// context happens at serialization time.
    pub fn doc_url(&self) -> String {
        format!("{DOCS_BASE_URL}#{}", self.0)
    }
}

impl TryFrom<String> for RuleId {
    type Error = InvalidViolation;

    fn try_from(id: String) -> Result<Self, Self::Error> {
        Self::new(id).ok_or(InvalidViolation::EmptyRuleId)
    }
}

impl From<RuleId> for String {
    fn from(id: RuleId) -> Self {
        id.0
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Published rule metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleInfo {
    pub id: &'static str,
    pub title: &'static str,
    /// How to rewrite a workflow so the rule no longer fires.
    pub description: &'static str,
}

impl RuleInfo {
    pub fn explain(&self) -> String {
        format!("{} - {}\n\n{}\n", self.id, self.title, self.description)
    }
}

/// Rules published by the analyzer, ordered by id.
pub const CATALOG: &[RuleInfo] = &[
    RuleInfo {
        id: "ADES100",
        title: "Expression in 'run:' directive",
        description: r##"When an expression appears in a 'run:' directive you can avoid potential attacks by extracting the
expression into an environment variable and using the environment variable instead.

For example, given the workflow snippet:

    - name: Example step
      run: |
        echo 'Hello ${{ inputs.name }}'

it can be made safer by converting it into:

    - name: Example step
      env:
        NAME: ${{ inputs.name }} # <- Assign the expression to an environment variable
      run: |
        echo "Hello $NAME"
      #      ^      ^^^^^
      #      |      | Replace the expression with the environment variable
      #      |
      #      | Note: the use of double quotes is required in this example (for interpolation)

Note that the changes depend on the runner and shell being used. For example, on Windows (or when
using 'shell: powershell') the environment variable must be accessed as '$Env:NAME'."##,
    },
    RuleInfo {
        id: "ADES101",
        title: "Expression in 'actions/github-script' script",
        description: r##"When an expression appears in a 'actions/github-script' script you can avoid potential attacks by
extracting the expression into an environment variable and using the environment variable instead.

For example, given the workflow snippet:

    - name: Example step
      uses: actions/github-script@v6
      with:
        script: console.log('Hello ${{ inputs.name }}')

it can be made safer by converting it into:

    - name: Example step
      uses: actions/github-script@v6
      env:
        NAME: ${{ inputs.name }} # <- Assign the expression to an environment variable
      with:
        script: console.log(`Hello ${process.env.NAME}`)
      #                     ^      ^^^^^^^^^^^^^^^^^^^
      #                     |      | Replace the expression with the environment variable
      #                     |
      #                     | Note: the use of backticks is required in this example (for interpolation)"##,
    },
    RuleInfo {
        id: "ADES102",
        title: "Expression in 'issue-close-message' input of 'roots/issue-closer-action'",
        description: r##"When an expression appears in the 'issue-close-message' input of 'roots/issue-closer-action' it is
interpreted as an ES6-style template literal. You can avoid potential attacks by extracting the
expression into an environment variable and using the environment variable instead.

For example, given the workflow snippet:

    - name: Example step
      uses: roots/issue-closer-action@v1
      with:
        issue-close-message: Closing ${{ github.event.issue.title }}

it can be made safer by converting it into:

    - name: Example step
      uses: roots/issue-closer-action@v1
      env:
        NAME: ${{ github.event.issue.title }} # <- Assign the expression to an environment variable
      with:
        issue-close-message: Closing ${process.env.NAME}
      #                              ^^^^^^^^^^^^^^^^^^^
      #                              | Replace the expression with the environment variable"##,
    },
    RuleInfo {
        id: "ADES103",
        title: "Expression in 'pr-close-message' input of 'roots/issue-closer-action'",
        description: r##"When an expression appears in the 'pr-close-message' input of 'roots/issue-closer-action' it is
interpreted as an ES6-style template literal. You can avoid potential attacks by extracting the
expression into an environment variable and using the environment variable instead.

For example, given the workflow snippet:

    - name: Example step
      uses: roots/issue-closer-action@v1
      with:
        pr-close-message: Closing ${{ github.event.issue.title }}

it can be made safer by converting it into:

    - name: Example step
      uses: roots/issue-closer-action@v1
      env:
        NAME: ${{ github.event.issue.title }} # <- Assign the expression to an environment variable
      with:
        pr-close-message: Closing ${process.env.NAME}
      #                           ^^^^^^^^^^^^^^^^^^^
      #                           | Replace the expression with the environment variable"##,
    },
    RuleInfo {
        id: "ADES104",
        title: "Expression in 'cmd' input of 'sergeysova/jq-action'",
        description: r##"When an expression appears in the 'cmd' input of 'sergeysova/jq-action' you can avoid any potential
attack by extracting the expression into an environment variable and using the environment variable
instead.

For example, given the workflow snippet:

    - name: Example step
      uses: sergeysova/jq-action@v2
      with:
        cmd: jq .version ${{ github.event.inputs.file }} -r

it can be made safer by converting it into:

    - name: Example step
      uses: sergeysova/jq-action@v2
      env:
        FILE: ${{ github.event.inputs.file }} # <- Assign the expression to an environment variable
      with:
      #                  | Note: use double quotes to avoid argument splitting
      #                  v
        cmd: jq .version "$FILE" -r
      #                   ^^^^^
      #                   | Replace the expression with the environment variable"##,
    },
    RuleInfo {
        id: "ADES105",
        title: "Expression in 'run' input of 'addnab/docker-run-action'",
        description: r##"When an expression appears in the 'run' input of 'addnab/docker-run-action' you can avoid any
potential attack by removing the expression. There is no safe way to use untrusted inputs here
without risking injection.

Do NOT pass environment variables into the container through the action's options input. This opens
up alternative attack vectors because the options are not validated."##,
    },
    RuleInfo {
        id: "ADES106",
        title: "Expression in 'expression' input of 'cardinalby/js-eval-action'",
        description: r##"When an expression appears in the 'expression' input of 'cardinalby/js-eval-action' you can avoid
any potential attack by extracting the expression into an environment variable and using the
environment variable instead.

For example, given the workflow snippet:

    - name: Example step
      uses: cardinalby/js-eval-action@v1
      with:
        expression: 1 + parseInt(${{ inputs.value }})

it can be made safer by converting it into:

    - name: Example step
      uses: cardinalby/js-eval-action@v1
      env:
        VALUE: ${{ inputs.value }} # <- Assign the expression to an environment variable
      with:
        expression: 1 + parseInt(env.VALUE)
      #                          ^^^^^^^^^
      #                          | Replace the expression with the environment variable"##,
    },
    RuleInfo {
        id: "ADES107",
        title: "Expression in 'custom_payload' input of '8398a7/action-slack'",
        description: r##"When an expression appears in the 'custom_payload' input of '8398a7/action-slack' you can avoid any
potential attack by extracting the expression into an environment variable and using the environment
variable instead.

For example, given the workflow snippet:

    - name: Example step
      uses: 8398a7/action-slack@v3
      with:
        custom_payload: |
          { attachments: [{ color: '${{ inputs.color }}' }] }

it can be made safer by converting it into:

    - name: Example step
      uses: 8398a7/action-slack@v3
      env:
        COLOR: ${{ inputs.color }} # <- Assign the expression to an environment variable
      with:
        custom_payload: |
          { attachments: [{ color: process.env.COLOR }] }
      #                            ^^^^^^^^^^^^^^^^^
      #                            | Replace the expression with the environment variable"##,
    },
    RuleInfo {
        id: "ADES108",
        title: "Expression in 'script' input of 'appleboy/ssh-action'",
        description: r##"When an expression appears in the 'script' input of 'appleboy/ssh-action' you can avoid any
potential attack by extracting the expression into an environment variable and using the environment
variable instead.

For example, given the workflow snippet:

    - name: Example step
      uses: appleboy/ssh-action@v1
      with:
        script: echo 'Hello ${{ inputs.name }}'

it can be made safer by converting it into:

    - name: Example step
      uses: appleboy/ssh-action@v1
      env:
        NAME: ${{ inputs.name }} # <- Assign the expression to an environment variable
      with:
        envs: NAME # <- Pass the environment variable through SSH
        script: echo "Hello $NAME"
      #              ^      ^^^^^
      #              |      | Replace the expression with the environment variable
      #              |
      #              | Note: the use of double quotes is required in this example (for interpolation)"##,
    },
    RuleInfo {
        id: "ADES200",
        title: "Expression in 'tag' input of 'ericcornelissen/git-tag-annotation-action'",
        description: r##"When an expression is used in the 'tag' input of 'ericcornelissen/git-tag-annotation-action' in
v1.0.0 or earlier it may be used to execute arbitrary shell commands, see GHSA-hgx2-4pp9-357g. To
mitigate this, upgrade the action to a non-vulnerable version."##,
    },
    RuleInfo {
        id: "ADES201",
        title: "Expression in 'sha' input of 'kceb/git-message-action'",
        description: r##"When an expression is used in the 'sha' input of 'kceb/git-message-action' in v1.1.0 or earlier it
may be used to execute arbitrary shell commands (no vulnerability identifier available). To mitigate
this, upgrade the action to a non-vulnerable version."##,
    },
    RuleInfo {
        id: "ADES202",
        title: "Expression in 'summary' input of 'atlassian/gajira-create'",
        description: r##"When an expression is used in the 'summary' input of 'atlassian/gajira-create' in v2.0.0 or earlier
it may be used to execute arbitrary JavaScript code, see GHSA-4xqx-pqpj-9fqw. To mitigate this,
upgrade the action to a non-vulnerable version."##,
    },
    RuleInfo {
        id: "ADES203",
        title: "Expression in 'args' input of 'SonarSource/sonarqube-scan-action'",
        description: r##"When an expression is used in the 'args' input of 'SonarSource/sonarqube-scan-action' between v4.0.0
and v5.3.0 it may be used to execute arbitrary shell commands, see GHSA-f79p-9c5r-xg88. To mitigate
this, upgrade the action to a non-vulnerable version."##,
    },
    RuleInfo {
        id: "ADES204",
        title: "Expression in 'lycheeVersion' input of 'lycheeverse/lychee'",
        description: r##"When an expression is used in the 'lycheeVersion' input of 'lycheeverse/lychee' in v2.0.1 or earlier
it may be used to execute arbitrary shell commands, see GHSA-65rg-554r-9j5x. To mitigate this,
upgrade the action to a non-vulnerable version."##,
    },
    RuleInfo {
        id: "ADES205",
        title: "Expression in 'pull-request-body' input of 'OZI-Project/publish'",
        description: r##"When an expression is used in the 'pull-request-body' input of 'OZI-Project/publish' between v1.13.2
and v1.13.5 it may be used to execute arbitrary shell commands, see GHSA-2487-9f55-2vg9. To mitigate
this, upgrade the action to a non-vulnerable version."##,
    },
    RuleInfo {
        id: "ADES206",
        title: "Expression in 'pattern' input of 'fish-shop/syntax-check'",
        description: r##"When an expression is used in the 'pattern' input of 'fish-shop/syntax-check' in v1.6.11 or earlier
it may be used to execute arbitrary shell commands, see GHSA-xj87-mqvh-88w2. To mitigate this,
upgrade the action to a non-vulnerable version."##,
    },
];

/// Find catalog metadata for a rule id, ignoring ASCII case. Unknown ids
/// are not an error here: the analyzer may ship rules newer than this
/// catalog.
pub fn lookup(id: &str) -> Option<&'static RuleInfo> {
    CATALOG.iter().find(|r| r.id.eq_ignore_ascii_case(id))
}

/// Explanation text for `id`, as printed by `ades-web explain`.
pub fn explain(id: &str) -> Result<String, UnknownRule> {
    lookup(id)
        .map(RuleInfo::explain)
        .ok_or_else(|| UnknownRule(id.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_rule_id_is_rejected() {
        assert!(RuleId::new("").is_none());
        assert_eq!(RuleId::new("ADES100").unwrap().as_str(), "ADES100");
    }

    #[test]
    fn doc_url_is_rules_page_with_id_fragment() {
        let id = RuleId::new("ADES101").unwrap();
        assert_eq!(
            id.doc_url(),
            "https://github.com/ericcornelissen/ades/blob/main/RULES.md#ADES101"
        );
    }

    #[test]
    fn catalog_ids_are_sorted_and_unique() {
        let ids: Vec<&str> = CATALOG.iter().map(|r| r.id).collect();
        let mut sorted = ids.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(ids, sorted);
    }

    #[test]
    fn every_rule_has_a_description() {
        for rule in CATALOG {
            assert!(!rule.description.trim().is_empty(), "{} has no description", rule.id);
        }
    }

    #[test]
    fn lookup_known_and_unknown() {
        assert_eq!(
            lookup("ADES200").map(|r| r.title),
            Some("Expression in 'tag' input of 'ericcornelissen/git-tag-annotation-action'")
        );
        assert!(lookup("ADES999").is_none());
    }

    #[test]
    fn lookup_ignores_case() {
        assert_eq!(lookup("ades101").map(|r| r.id), Some("ADES101"));
    }

    #[test]
    fn explain_starts_with_id_and_title() {
        let text = explain("ADES100").unwrap();
        assert!(text.starts_with("ADES100 - Expression in 'run:' directive\n\n"));
        assert!(text.contains("echo \"Hello $NAME\""));
    }

    #[test]
    fn explain_unknown_rule_is_error() {
        let err = explain("ADES000").unwrap_err();
        assert_eq!(err.to_string(), "unknown rule \"ADES000\"");
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = RuleId::new("ADES100").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"ADES100\"");
    }

    #[test]
    fn deserializing_empty_id_fails() {
        assert!(serde_json::from_str::<RuleId>("\"\"").is_err());
        let id: RuleId = serde_json::from_str("\"ADES104\"").unwrap();
        assert_eq!(id.as_str(), "ADES104");
    }
}
