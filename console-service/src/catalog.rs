//! Predefined query catalog.
//!
//! The fixed menu of reports over the sample company schema (people,
//! employees, departments, job postings, interviews, sales, vendors and the
//! report views built on them). Order is menu order.

use common::models::PredefinedQuery;

/// A named canned query.
pub struct CatalogEntry {
    pub name: &'static str,
    pub sql: &'static str,
}

pub static CATALOG: &[CatalogEntry] = &[
    CatalogEntry {
        name: "Interviewers for Hellen Cole (Job 11111)",
        sql: "SELECT DISTINCT i.InterviewerID, p.LastName, p.FirstName \
              FROM InterviewerAssignment i \
              JOIN Interview iv ON i.InterviewID = iv.InterviewID \
              JOIN JobPosition jp ON iv.JobID = jp.JobID \
              JOIN Person p ON i.InterviewerID = p.PersonID \
              WHERE iv.CandidateID = (SELECT PersonID FROM Person WHERE FirstName = 'Hellen' AND LastName = 'Cole') \
              AND jp.JobID = 11111",
    },
    CatalogEntry {
        name: "Jobs posted by Marketing (January 2011)",
        sql: "SELECT j.JobID \
              FROM JobPosition j \
              JOIN Department d ON j.DepartmentID = d.Department_ID \
              WHERE d.DepartmentName = 'Marketing' \
              AND j.PostedDate >= '2011-01-01' \
              AND j.PostedDate < '2011-02-01'",
    },
    CatalogEntry {
        name: "Employees with no supervisees",
        sql: "SELECT e.PersonID, CONCAT(p.FirstName, ' ', p.LastName) AS Name \
              FROM Employee e \
              JOIN Person p ON e.PersonID = p.PersonID \
              WHERE e.PersonID NOT IN (SELECT SupervisorID FROM Employee WHERE SupervisorID IS NOT NULL)",
    },
    CatalogEntry {
        name: "Marketing sites with no sales (March 2011)",
        sql: "SELECT s.SiteID, s.Location \
              FROM Site s \
              JOIN Department d ON d.DepartmentName = 'Marketing' \
              WHERE s.SiteID NOT IN (SELECT SiteID FROM Sale WHERE SalesTime BETWEEN '2011-03-01' AND '2011-03-31')",
    },
    CatalogEntry {
        name: "Jobs with no hires after 1 month of posting",
        sql: "SELECT jp.JobID, jp.JobDescription \
              FROM JobPosition jp \
              WHERE NOT EXISTS (\
                  SELECT 1 FROM Application a \
                  WHERE a.JobID = jp.JobID \
                  AND a.ApplicationDate <= DATE_ADD(jp.PostedDate, INTERVAL 1 MONTH) \
                  AND a.Status = 'Selected')",
    },
    CatalogEntry {
        name: "Salespeople who sold all products > $200",
        sql: "SELECT sp.PersonID, CONCAT(p.FirstName, ' ', p.LastName) AS Name \
              FROM Employee sp \
              JOIN Person p ON sp.PersonID = p.PersonID \
              WHERE NOT EXISTS (\
                  SELECT pt.ProductType FROM Product pt \
                  WHERE pt.ListPrice > 200 \
                  AND pt.ProductType NOT IN (\
                      SELECT DISTINCT pr.ProductType FROM Sale s \
                      JOIN Product pr ON s.ProductID = pr.ProductID \
                      WHERE s.SalesPersonID = sp.PersonID))",
    },
    CatalogEntry {
        name: "Departments with no job posts (Jan-Feb 2011)",
        sql: "SELECT d.Department_ID, d.DepartmentName \
              FROM Department d \
              WHERE d.Department_ID NOT IN (\
                  SELECT jp.DepartmentID FROM JobPosition jp \
                  WHERE jp.PostedDate BETWEEN '2011-01-01' AND '2011-02-28')",
    },
    CatalogEntry {
        name: "Employees applying for job 12345",
        sql: "SELECT e.PersonID AS EmployeeID, CONCAT(p.FirstName, ' ', p.LastName) AS Name, ed.DepartmentID \
              FROM Employee e \
              JOIN Person p ON e.PersonID = p.PersonID \
              JOIN Application a ON e.PersonID = a.ApplicantID \
              JOIN JobPosition jp ON a.JobID = jp.JobID \
              LEFT JOIN EmployeeDepartmentAssignment ed ON e.PersonID = ed.EmployeeID \
              WHERE jp.JobID = 12345",
    },
    CatalogEntry {
        name: "Best seller's type",
        sql: "SELECT pt.Type AS EmployeeType, COUNT(*) AS TotalSales \
              FROM Sale s \
              JOIN Employee e ON s.SalesPersonID = e.PersonID \
              JOIN PersonType pt ON e.PersonID = pt.PersonID \
              WHERE pt.Type = 'Employee' \
              GROUP BY pt.Type \
              ORDER BY TotalSales DESC \
              LIMIT 1",
    },
    CatalogEntry {
        name: "Product type with highest net profit",
        sql: "SELECT pr.ProductType \
              FROM Product pr \
              JOIN ProductPart pp ON pr.ProductID = pp.ProductID \
              JOIN VendorPart vp ON pp.PartID = vp.PartID \
              GROUP BY pr.ProductType \
              ORDER BY (SUM(pr.ListPrice) - SUM(vp.Price)) DESC \
              LIMIT 1",
    },
    CatalogEntry {
        name: "Employees working in all departments",
        sql: "SELECT e.EmployeeID AS PersonID, p.LastName, p.FirstName \
              FROM EmployeeDepartmentAssignment e \
              JOIN Person p ON e.EmployeeID = p.PersonID \
              GROUP BY e.EmployeeID, p.LastName, p.FirstName \
              HAVING COUNT(DISTINCT e.DepartmentID) = (SELECT COUNT(*) FROM Department)",
    },
    CatalogEntry {
        name: "Interviewees selected (name and email)",
        sql: "SELECT CONCAT(p.FirstName, ' ', p.LastName) AS IntervieweeName, p.Email AS EmailAddress \
              FROM Interview i \
              JOIN Person p ON i.CandidateID = p.PersonID \
              WHERE EXISTS (\
                  SELECT 1 FROM InterviewGrade ig \
                  WHERE ig.InterviewID = i.InterviewID AND ig.Grade >= 70 \
                  GROUP BY ig.InterviewID \
                  HAVING COUNT(DISTINCT ig.RoundNumber) >= 5)",
    },
    CatalogEntry {
        name: "Interviewees (name, phone, email)",
        sql: "SELECT p.FirstName, p.LastName, ph.PhoneNumber, p.Email \
              FROM Person p \
              JOIN PhoneNumber ph ON p.PersonID = ph.PersonID \
              JOIN Interview i ON p.PersonID = i.CandidateID \
              WHERE EXISTS (\
                  SELECT 1 FROM InterviewGrade ig \
                  WHERE ig.InterviewID = i.InterviewID AND ig.Grade >= 70 \
                  GROUP BY ig.InterviewID \
                  HAVING COUNT(DISTINCT ig.RoundNumber) >= 5)",
    },
    CatalogEntry {
        name: "Employee with highest average salary",
        sql: "SELECT p.PersonID, p.FirstName, p.LastName \
              FROM Person p \
              JOIN Salary s ON p.PersonID = s.EmployeeID \
              GROUP BY s.EmployeeID \
              ORDER BY AVG(s.Amount) DESC \
              LIMIT 1",
    },
    CatalogEntry {
        name: "Vendor supplying 'Cup' (lowest price)",
        sql: "SELECT v.VendorID, v.Name AS VendorName \
              FROM Vendor v \
              JOIN VendorPart vp ON v.VendorID = vp.VendorID \
              JOIN Part p ON vp.PartID = p.PartID \
              JOIN Product pr ON p.ProductID = pr.ProductID \
              WHERE pr.ProductType = 'Cup' AND pr.Weight < 4 \
              AND vp.Price = (\
                  SELECT MIN(vp2.Price) FROM VendorPart vp2 \
                  JOIN Part p2 ON vp2.PartID = p2.PartID \
                  JOIN Product pr2 ON p2.ProductID = pr2.ProductID \
                  WHERE pr2.ProductType = 'Cup' AND pr2.Weight < 4)",
    },
    CatalogEntry {
        name: "View: Employee Average Monthly Salaries",
        sql: "SELECT * FROM EmployeeAverageSalary ORDER BY AverageMonthlySalary DESC",
    },
    CatalogEntry {
        name: "View: Interview Rounds Passed",
        sql: "SELECT * FROM InterviewRoundsPassed WHERE PassedRounds >= 5 ORDER BY PassedRounds DESC",
    },
    CatalogEntry {
        name: "View: Product Type Sales",
        sql: "SELECT * FROM ProductTypeSales ORDER BY TotalItemsSold DESC",
    },
    CatalogEntry {
        name: "View: Product Part Costs",
        sql: "SELECT * FROM ProductPartCost ORDER BY TotalPartCost DESC",
    },
];

/// SQL of the entry with the given menu label.
pub fn find(name: &str) -> Option<&'static str> {
    CATALOG.iter().find(|e| e.name == name).map(|e| e.sql)
}

/// The whole menu, in order.
pub fn list() -> Vec<PredefinedQuery> {
    CATALOG
        .iter()
        .map(|e| PredefinedQuery {
            name: e.name.to_string(),
            sql: e.sql.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::utils::SqlText;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_names_are_unique() {
        let names: HashSet<_> = CATALOG.iter().map(|e| e.name).collect();
        assert_eq!(names.len(), CATALOG.len());
        assert_eq!(CATALOG.len(), 19);
    }

    #[test]
    fn test_every_entry_is_a_select() {
        for entry in CATALOG {
            assert_eq!(
                SqlText::leading_keyword(entry.sql).as_deref(),
                Some("SELECT"),
                "{} is not a query",
                entry.name
            );
        }
    }

    #[test]
    fn test_find_by_name() {
        assert!(find("Best seller's type").unwrap().contains("GROUP BY pt.Type"));
        assert!(find("No such report").is_none());
        assert_eq!(list().first().map(|q| q.name.as_str()), Some(CATALOG[0].name));
    }
}
