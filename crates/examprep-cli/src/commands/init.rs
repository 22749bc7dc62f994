//! The `examprep init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("examprep.toml").exists() {
        println!("examprep.toml already exists, skipping.");
    } else {
        std::fs::write("examprep.toml", SAMPLE_CONFIG)?;
        println!("Created examprep.toml");
    }

    std::fs::create_dir_all("questions")?;
    let sample_path = std::path::Path::new("questions/sample.txt");
    if sample_path.exists() {
        println!("questions/sample.txt already exists, skipping.");
    } else {
        std::fs::write(sample_path, SAMPLE_BANK)?;
        println!("Created questions/sample.txt");
    }

    println!("\nNext steps:");
    println!("  1. Add your questions to questions/sample.txt (or point at your own bank)");
    println!("  2. Run: examprep validate --questions questions/sample.txt");
    println!("  3. Run: examprep study --questions questions/sample.txt --domain 1");
    println!("  4. Run: examprep exam --questions questions/sample.txt");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# examprep configuration

passing_percentage = 80.0
duration_minutes = 150
low_time_warning_secs = 600
default_study_count = 10

# Domains are visited in this order when a practice exam is assembled.
[[domains]]
number = 1
name = "Governance, Risk, and Compliance"
quota = 32

[[domains]]
number = 2
name = "Information Security Controls and Audit Management"
quota = 30

[[domains]]
number = 3
name = "Security Program Management and Operations"
quota = 32

[[domains]]
number = 4
name = "Information Security Core Competencies"
quota = 29

[[domains]]
number = 5
name = "Strategic Planning, Finance, Procurement, and Vendor Management"
quota = 29
"#;

const SAMPLE_BANK: &str = "\
Sample question bank. Text before the first record is ignored.

----Question 1
Domain: Domain 1: Governance, Risk, and Compliance
Question text: Which document sets the overall direction of an information security program?
Options:
A. Information security policy [CORRECT]
B. Incident response playbook
C. Firewall rule base
D. Asset inventory
Excerpt from source: Policies express management intent and direction.

----Question 2
Domain: Domain 2: Information Security Controls and Audit Management
Question text: What is the primary purpose of a compensating control?
Options:
A. To replace all preventive controls
B. To satisfy a requirement when the primary control is not feasible [CORRECT]
C. To detect insider threats
D. To reduce audit scope
Excerpt from source: Compensating controls provide alternative protection.

----Question 3
Domain: Domain 3: Security Program Management and Operations
Question text: Which activity comes first when starting a new security project?
Options:
A. Procuring tools
B. Hiring contractors
C. Defining scope and objectives [CORRECT]
D. Running a penetration test
Excerpt from source: Project charters define scope before execution.

----Question 4
Domain: Domain 4: Information Security Core Competencies
Question text: Which principle limits users to the access needed for their job?
Options:
A. Defense in depth
B. Separation of duties
C. Need to know
D. Least privilege [CORRECT]
Excerpt from source: Least privilege restricts access rights to the minimum necessary.

----Question 5
Domain: Domain 5: Strategic Planning, Finance, Procurement, and Vendor Management
Question text: Which metric compares the cost of a control with the loss it prevents?
Options:
A. Return on security investment [CORRECT]
B. Mean time to repair
C. Recovery point objective
D. Annualized rate of occurrence
Excerpt from source: ROSI expresses the value of a control in financial terms.
";
