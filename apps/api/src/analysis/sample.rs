// Bundled demo data for the "try it" flow.

pub const DEMO_JOB_ROLE: &str = "Software Engineer";

/// Target roles offered in the role picker. Free-form roles are accepted too.
pub const SUGGESTED_JOB_ROLES: [&str; 10] = [
    "Software Engineer",
    "Frontend Developer",
    "Backend Developer",
    "Full Stack Developer",
    "Data Scientist",
    "Product Manager",
    "UX/UI Designer",
    "DevOps Engineer",
    "Cybersecurity Analyst",
    "Marketing Manager",
];

pub const SAMPLE_RESUME: &str = "\
John Doe
Software Engineer
john.doe@email.com | (123) 456-7890 | linkedin.com/in/johndoe | github.com/johndoe

Professional Summary
Experienced Software Engineer with a passion for developing innovative programs that expedite \
the efficiency and effectiveness of organizational success. Well-versed in technology and \
writing code to create systems that are reliable and user-friendly.

Skills
- JavaScript, React, Node.js
- HTML, CSS
- Python
- SQL, MongoDB

Experience
Software Developer | Tech Solutions Inc. | 2020 - Present
- Developed and maintained web applications.
- Collaborated with cross-functional teams.

Education
B.S. in Computer Science | University of Technology | 2016 - 2020
";
